//! Simple ray tracer example.
//!
//! Builds a small scene in code, traces it and saves a PPM.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use kiln_core::ColorBuffer;
use kiln_renderer::{
    trace, CameraConfig, CheckerSampler, Color, Dielectric, Emissive, Lambertian, Metal, Plane,
    RenderConfig, Scene, Sphere, Vec3,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Kiln Ray Tracer - Simple Example");
    println!("================================");

    let (width, height) = (400, 225);
    let scene = build_scene();

    let camera = CameraConfig::new()
        .with_resolution(width, height)
        .with_position(
            Vec3::new(0.0, 1.0, 4.0),  // look_from
            Vec3::new(0.0, 0.5, -1.0), // look_at
            Vec3::Y,                   // vup
        )
        .with_lens(50.0, 0.1, 5.0)
        .build()?;

    let config = RenderConfig {
        samples_per_pixel: 32,
        max_depth: 10,
        use_sky_gradient: true,
        seed: Some(1),
        ..Default::default()
    };

    println!(
        "Rendering {}x{} @ {} spp...",
        width, height, config.samples_per_pixel
    );

    let start = std::time::Instant::now();
    let mut buffer = ColorBuffer::new(width, height);
    trace(&mut buffer, &scene, &camera, &config)?;
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    save_ppm(&buffer, filename)?;
    println!("Saved to {}", filename);
    Ok(())
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    // Ground
    scene.add(Box::new(Plane::new(
        Vec3::ZERO,
        Vec3::Y,
        Arc::new(Lambertian::with_sampler(Arc::new(CheckerSampler::from_colors(
            Color::new(0.2, 0.3, 0.1),
            Color::new(0.9, 0.9, 0.9),
            0.5,
        )))),
    )));

    scene.add(Box::new(Sphere::new(
        Vec3::new(0.0, 1.0, -1.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    scene.add(Box::new(Sphere::new(
        Vec3::new(-2.0, 0.7, -1.5),
        0.7,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    scene.add(Box::new(Sphere::new(
        Vec3::new(2.0, 0.7, -1.5),
        0.7,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.05)),
    )));

    // Small overhead light
    scene.add(Box::new(Sphere::new(
        Vec3::new(0.0, 6.0, 0.0),
        1.5,
        Arc::new(Emissive::new(Color::splat(4.0))),
    )));

    scene
}

/// Write the buffer as a binary PPM, dropping alpha.
fn save_ppm(buffer: &ColorBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P6")?;
    writeln!(writer, "{} {}", buffer.width(), buffer.height())?;
    writeln!(writer, "255")?;

    for pixel in buffer.as_bytes().chunks_exact(4) {
        writer.write_all(&pixel[..3])?;
    }

    writer.flush()
}
