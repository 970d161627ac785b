//! Turn a validated scene description into traceable objects.

use std::collections::HashMap;
use std::sync::Arc;

use kiln_core::{
    ColorBuffer, GeometryDesc, ImageCache, MaterialDesc, SamplerDesc, SamplerRef, SceneDesc,
    SceneError, SceneResult,
};
use log::{debug, info, warn};

use crate::{
    Camera, CameraConfig, CheckerSampler, ColorSampler, Dielectric, Emissive, Hittable,
    Lambertian, Material, Metal, Plane, RenderConfig, Sampler, Scene, Sphere, TextureSampler,
};

/// Everything needed to start a trace.
pub struct RenderJob {
    pub scene: Scene,
    pub camera: Camera,
    pub config: RenderConfig,
    pub width: u32,
    pub height: u32,
}

impl RenderJob {
    /// An output buffer sized for this job.
    pub fn buffer(&self) -> ColorBuffer {
        ColorBuffer::new(self.width, self.height)
    }
}

/// Build scene, camera and render settings from a description.
pub fn build_render(desc: &SceneDesc, cache: &mut ImageCache) -> SceneResult<RenderJob> {
    let scene = build_scene(desc, cache)?;
    let (width, height) = (desc.render.width, desc.render.height);
    let camera = CameraConfig::from_desc(&desc.camera, width, height).build()?;

    Ok(RenderJob {
        scene,
        camera,
        config: RenderConfig::from_settings(&desc.render),
        width,
        height,
    })
}

/// Build the scene objects. The whole description is validated first, so a
/// bad scene fails here and never mid-trace.
pub fn build_scene(desc: &SceneDesc, cache: &mut ImageCache) -> SceneResult<Scene> {
    desc.validate()?;

    let mut samplers: HashMap<String, Arc<dyn Sampler>> = HashMap::new();
    for named in &desc.samplers {
        let sampler = build_sampler(&named.sampler, &samplers, cache)?;
        samplers.insert(named.name.clone(), sampler);
    }

    let mut scene = Scene::new();
    for (index, object) in desc.objects.iter().enumerate() {
        let material = build_material(index, &object.material, &samplers)?;
        let hittable: Box<dyn Hittable> = match &object.geometry {
            GeometryDesc::Sphere { center, radius } => {
                Box::new(Sphere::new(*center, *radius, material))
            }
            GeometryDesc::Plane { point, normal } => {
                Box::new(Plane::new(*point, *normal, material))
            }
        };
        scene.add(hittable);
    }

    info!(
        "Built scene: {} objects, {} samplers, {} images",
        scene.len(),
        samplers.len(),
        cache.len()
    );
    Ok(scene)
}

fn build_sampler(
    desc: &SamplerDesc,
    named: &HashMap<String, Arc<dyn Sampler>>,
    cache: &mut ImageCache,
) -> SceneResult<Arc<dyn Sampler>> {
    let sampler: Arc<dyn Sampler> = match desc {
        SamplerDesc::Color { color } => Arc::new(ColorSampler::new(*color)),
        SamplerDesc::Checker { even, odd, scale } => Arc::new(CheckerSampler::new(
            resolve(even, named)?,
            resolve(odd, named)?,
            *scale,
        )),
        SamplerDesc::Texture { path, scale } => {
            let image = cache.load(path)?;
            debug!("Texture sampler '{}' ({}x{})", path, image.width(), image.height());
            Arc::new(TextureSampler::new(image, *scale))
        }
    };
    Ok(sampler)
}

fn resolve(slot: &SamplerRef, named: &HashMap<String, Arc<dyn Sampler>>) -> SceneResult<Arc<dyn Sampler>> {
    match slot {
        SamplerRef::Color(color) => Ok(Arc::new(ColorSampler::new(*color))),
        SamplerRef::Named(name) => named
            .get(name)
            .cloned()
            .ok_or_else(|| SceneError::UnknownSampler(name.clone())),
    }
}

fn build_material(
    index: usize,
    desc: &MaterialDesc,
    named: &HashMap<String, Arc<dyn Sampler>>,
) -> SceneResult<Arc<dyn Material>> {
    let sampler = resolve(desc.sampler_ref(), named)?;
    let material: Arc<dyn Material> = match desc {
        MaterialDesc::Lambertian { .. } => Arc::new(Lambertian::with_sampler(sampler)),
        MaterialDesc::Metal { fuzz, .. } => {
            if *fuzz > 1.0 {
                warn!("Object {}: metal fuzz {} clamped to 1", index, fuzz);
            }
            Arc::new(Metal::with_sampler(sampler, *fuzz))
        }
        MaterialDesc::Dielectric {
            refraction_index, ..
        } => Arc::new(Dielectric::with_sampler(sampler, *refraction_index)),
        MaterialDesc::Emissive { .. } => Arc::new(Emissive::with_sampler(sampler)),
    };
    Ok(material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Ray};
    use kiln_core::{ImageData, NamedSampler, ObjectDesc, RenderSettings};
    use kiln_math::{Interval, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn floor_with(material: MaterialDesc) -> ObjectDesc {
        ObjectDesc {
            geometry: GeometryDesc::Plane {
                point: Vec3::new(0.0, -1.0, 0.0),
                normal: Vec3::Y,
            },
            material,
        }
    }

    fn scene_desc(samplers: Vec<NamedSampler>, objects: Vec<ObjectDesc>) -> SceneDesc {
        SceneDesc {
            samplers,
            objects,
            camera: Default::default(),
            render: RenderSettings {
                width: 32,
                height: 16,
                ..Default::default()
            },
        }
    }

    /// Attenuation of whatever the downward ray from the origin hits first.
    fn floor_albedo(scene: &Scene) -> Color {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Y);
        let rec = scene.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        rec.material.scatter(&ray, &rec, &mut rng).unwrap().attenuation
    }

    #[test]
    fn test_build_literal_colors() {
        let desc = scene_desc(
            vec![],
            vec![
                floor_with(MaterialDesc::Lambertian {
                    albedo: Vec3::new(0.2, 0.4, 0.6).into(),
                }),
                ObjectDesc {
                    geometry: GeometryDesc::Sphere {
                        center: Vec3::new(0.0, 5.0, 0.0),
                        radius: 1.0,
                    },
                    material: MaterialDesc::Emissive {
                        emission: Vec3::splat(4.0).into(),
                    },
                },
            ],
        );

        let scene = build_scene(&desc, &mut ImageCache::new()).unwrap();
        assert_eq!(scene.len(), 2);
        assert_eq!(floor_albedo(&scene), Color::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_named_samplers_feed_checker() {
        let desc = scene_desc(
            vec![
                NamedSampler {
                    name: "red".to_string(),
                    sampler: SamplerDesc::Color { color: Color::X },
                },
                NamedSampler {
                    name: "floor".to_string(),
                    sampler: SamplerDesc::Checker {
                        even: "red".into(),
                        odd: Color::Z.into(),
                        scale: 1.0,
                    },
                },
            ],
            vec![floor_with(MaterialDesc::Lambertian {
                albedo: "floor".into(),
            })],
        );

        let scene = build_scene(&desc, &mut ImageCache::new()).unwrap();
        // Hit at (0, -1, 0): parity 0 + (-1) + 0 is odd
        assert_eq!(floor_albedo(&scene), Color::Z);
    }

    #[test]
    fn test_unknown_sampler_is_rejected() {
        let desc = scene_desc(
            vec![],
            vec![floor_with(MaterialDesc::Lambertian {
                albedo: "missing".into(),
            })],
        );

        let err = build_scene(&desc, &mut ImageCache::new()).err().unwrap();
        assert!(matches!(err, SceneError::UnknownSampler(name) if name == "missing"));
    }

    #[test]
    fn test_invalid_geometry_is_rejected_before_building() {
        let desc = scene_desc(
            vec![],
            vec![ObjectDesc {
                geometry: GeometryDesc::Sphere {
                    center: Vec3::ZERO,
                    radius: 0.0,
                },
                material: MaterialDesc::Lambertian {
                    albedo: Color::ONE.into(),
                },
            }],
        );

        let err = build_scene(&desc, &mut ImageCache::new()).err().unwrap();
        assert!(matches!(err, SceneError::InvalidRadius { index: 0, .. }));
    }

    #[test]
    fn test_texture_from_cache() {
        let mut cache = ImageCache::new();
        cache.insert(
            "red.png",
            ImageData::new(1, 1, 3, vec![255, 0, 0]).unwrap(),
        );
        let desc = scene_desc(
            vec![NamedSampler {
                name: "tex".to_string(),
                sampler: SamplerDesc::Texture {
                    path: "red.png".to_string(),
                    scale: 1.0,
                },
            }],
            vec![floor_with(MaterialDesc::Lambertian {
                albedo: "tex".into(),
            })],
        );

        let scene = build_scene(&desc, &mut cache).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(floor_albedo(&scene), Color::X);
    }

    #[test]
    fn test_missing_texture_file_is_an_error() {
        let desc = scene_desc(
            vec![NamedSampler {
                name: "tex".to_string(),
                sampler: SamplerDesc::Texture {
                    path: "does/not/exist.png".to_string(),
                    scale: 1.0,
                },
            }],
            vec![],
        );

        let err = build_scene(&desc, &mut ImageCache::new()).err().unwrap();
        assert!(matches!(err, SceneError::Image(_)));
    }

    #[test]
    fn test_build_render_job() {
        let desc = scene_desc(
            vec![],
            vec![floor_with(MaterialDesc::Metal {
                albedo: Color::ONE.into(),
                fuzz: 3.0,
            })],
        );

        let job = build_render(&desc, &mut ImageCache::new()).unwrap();
        assert_eq!(job.scene.len(), 1);
        assert_eq!((job.width, job.height), (32, 16));
        assert_eq!(job.config.samples_per_pixel, 100);

        let buffer = job.buffer();
        assert_eq!((buffer.width(), buffer.height()), (32, 16));
    }
}
