//! Built-in demo scene: four spheres over a checker floor under a big light.

use kiln_core::{
    CameraDesc, GeometryDesc, MaterialDesc, NamedSampler, ObjectDesc, RenderSettings,
    SamplerDesc, SceneDesc,
};
use kiln_math::Vec3;

fn sphere(center: Vec3, radius: f32, material: MaterialDesc) -> ObjectDesc {
    ObjectDesc {
        geometry: GeometryDesc::Sphere { center, radius },
        material,
    }
}

fn checker(name: &str, even: Vec3, odd: Vec3, scale: f32) -> NamedSampler {
    NamedSampler {
        name: name.to_string(),
        sampler: SamplerDesc::Checker {
            even: even.into(),
            odd: odd.into(),
            scale,
        },
    }
}

pub fn demo_scene() -> SceneDesc {
    let samplers = vec![
        checker("floor", Vec3::ZERO, Vec3::ONE, 1.0),
        checker("red_checker", Vec3::ZERO, Vec3::X, 0.5),
        checker("steel", Vec3::splat(0.8), Vec3::splat(0.6), 0.25),
    ];

    let objects = vec![
        sphere(
            Vec3::new(0.0, 4.0, -7.0),
            2.5,
            MaterialDesc::Lambertian {
                albedo: "red_checker".into(),
            },
        ),
        sphere(
            Vec3::new(4.0, 1.0, -8.0),
            3.2,
            MaterialDesc::Lambertian {
                albedo: Vec3::new(0.4, 0.25, 0.6).into(),
            },
        ),
        sphere(
            Vec3::new(-3.0, 2.0, -8.0),
            1.0,
            MaterialDesc::Metal {
                albedo: "steel".into(),
                fuzz: 0.15,
            },
        ),
        sphere(
            Vec3::new(2.0, -1.0, -4.0),
            1.5,
            MaterialDesc::Dielectric {
                albedo: Vec3::new(0.6, 0.8, 0.25).into(),
                refraction_index: 2.0,
            },
        ),
        ObjectDesc {
            geometry: GeometryDesc::Plane {
                point: Vec3::new(0.0, -2.0, 0.0),
                normal: Vec3::Y,
            },
            material: MaterialDesc::Lambertian {
                albedo: "floor".into(),
            },
        },
        // Light
        sphere(
            Vec3::new(0.0, 25.0, 0.0),
            10.0,
            MaterialDesc::Emissive {
                emission: Vec3::splat(10.0).into(),
            },
        ),
    ];

    SceneDesc {
        samplers,
        objects,
        camera: CameraDesc {
            eye: Vec3::new(5.0, 1.0, 2.0),
            look_at: Vec3::new(0.0, 2.0, -10.0),
            up: Vec3::Y,
            vfov: 90.0,
            aperture: 0.2,
            focus_distance: None,
        },
        render: RenderSettings::default(),
    }
}
