use std::{collections::HashSet, sync::Arc, thread};

use cgmath::Point3;
use voxel_worldgen::{
    generate_chunk,
    task_management::TaskManager,
    worldgen::{
        color::{ColorScheme, BAND_WIDTH},
        density::{DensityFunction, GeneratorMode},
        noise_sampler::NoiseSampler,
        seed::Seed,
        world::World,
    },
    ChunkGenerator, GeneratorSettings, Voxel,
};

fn all_variants() -> Vec<(GeneratorMode, ColorScheme)> {
    GeneratorMode::ALL
        .iter()
        .flat_map(|&mode| ColorScheme::ALL.iter().map(move |&scheme| (mode, scheme)))
        .collect()
}

#[test]
fn seed_42_origin_chunk_is_reproducible() {
    let generate = || {
        generate_chunk(
            Seed(42),
            GeneratorMode::Default,
            ColorScheme::HsvWheel,
            Point3::new(0, 0, 0),
            2,
        )
        .unwrap()
        .into_bytes()
    };
    let first = generate();
    assert_eq!(first.len(), 32);
    assert_eq!(first, generate());
}

#[test]
fn every_variant_is_deterministic() {
    for (mode, scheme) in all_variants() {
        for seed in [0, 42, -1337, i32::MAX] {
            let position = Point3::new(3, -2, 7);
            let a = generate_chunk(Seed(seed), mode, scheme, position, 8).unwrap();
            let b = generate_chunk(Seed(seed), mode, scheme, position, 8).unwrap();
            assert_eq!(a, b, "{mode} / {scheme} with seed {seed}");
        }
    }
}

#[test]
fn neighbouring_chunks_differ() {
    let size = 8;
    for (mode, scheme) in all_variants() {
        let origin = generate_chunk(Seed(42), mode, scheme, Point3::new(0, 0, 0), size).unwrap();
        let east = generate_chunk(Seed(42), mode, scheme, Point3::new(1, 0, 0), size).unwrap();
        assert_ne!(origin.as_bytes(), east.as_bytes(), "{mode} / {scheme}");
    }
}

#[test]
fn chunk_borders_are_spatially_consistent() {
    let size = 4u8;
    let generator = ChunkGenerator::new(Seed(42), size, GeneratorSettings::default()).unwrap();
    let east = generator.generate(Point3::new(1, 0, 0)).unwrap();

    // The first voxel of chunk (1, 0, 0) sits at world x = size.
    assert_eq!(east.voxels()[0], generator.voxel_at(Point3::new(size as i32, 0, 0)));

    // A double-size chunk at the origin covers chunk (1, 0, 0) of the smaller size.
    let wide = ChunkGenerator::new(Seed(42), size * 2, GeneratorSettings::default())
        .unwrap()
        .generate(Point3::new(0, 0, 0))
        .unwrap();
    let s = size as usize;
    for z in 0..s {
        for y in 0..s {
            for x in 0..s {
                assert_eq!(east.voxel(x, y, z), wide.voxel(x + s, y, z));
            }
        }
    }
}

#[test]
fn struct_view_and_flat_bytes_agree() {
    let chunk = generate_chunk(
        Seed(7),
        GeneratorMode::Terrain,
        ColorScheme::BandedGradient,
        Point3::new(0, 1, 0),
        4,
    )
    .unwrap();
    let bytes = chunk.as_bytes();
    for (i, voxel) in chunk.voxels().iter().enumerate() {
        assert_eq!(
            *voxel,
            Voxel {
                value: bytes[4 * i],
                r: bytes[4 * i + 1],
                g: bytes[4 * i + 2],
                b: bytes[4 * i + 3],
            }
        );
    }
}

#[test]
fn banded_colors_cover_the_gradient() {
    let chunk = ChunkGenerator::new(Seed(99), 16, GeneratorSettings::legacy())
        .unwrap()
        .generate(Point3::new(0, 0, 0))
        .unwrap();
    for voxel in chunk.voxels() {
        let sum = voxel.r as u16 + voxel.g as u16 + voxel.b as u16;
        assert_eq!(sum, 255, "{voxel:?} is not on the gradient");
    }
}

#[test]
fn concurrent_generation_with_different_seeds_matches_serial() {
    let seeds = [1, 2, 3, 4, 5, 6, 7, 8];
    let position = Point3::new(-1, 0, 2);
    let serial: Vec<_> = seeds
        .iter()
        .map(|&seed| {
            generate_chunk(Seed(seed), GeneratorMode::Terrain, ColorScheme::HsvWheel, position, 8)
                .unwrap()
        })
        .collect();

    let handles: Vec<_> = seeds
        .iter()
        .map(|&seed| {
            thread::spawn(move || {
                generate_chunk(Seed(seed), GeneratorMode::Terrain, ColorScheme::HsvWheel, position, 8)
                    .unwrap()
            })
        })
        .collect();
    let parallel: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(serial, parallel);
}

#[test]
fn shared_generator_across_threads() {
    let generator =
        Arc::new(ChunkGenerator::new(Seed(5), 6, GeneratorSettings::terrain()).unwrap());
    let positions: Vec<_> = (0..6).map(|i| Point3::new(i, -i, i % 2)).collect();

    let handles: Vec<_> = positions
        .iter()
        .map(|&position| {
            let generator = generator.clone();
            thread::spawn(move || generator.generate(position).unwrap())
        })
        .collect();

    for (handle, position) in handles.into_iter().zip(positions) {
        let chunk = handle.join().unwrap();
        assert_eq!(chunk.position(), position);
        assert_eq!(chunk, generator.generate(position).unwrap());
    }
}

/// Generates 16 chunks of 32^3, spread over a 384 x 384 area with two-chunk gaps, on the
/// worker pool and returns every voxel.
fn generate_slab(settings: GeneratorSettings) -> Vec<Voxel> {
    let generator = ChunkGenerator::new(Seed(42), 32, settings).unwrap();
    let mut world = World::new(Arc::new(generator));
    let mut task_manager = TaskManager::with_available_parallelism();
    for z in 0..4 {
        for x in 0..4 {
            world.request_chunk(Point3::new(x * 3, 0, z * 3), &mut task_manager);
        }
    }
    task_manager.wait_for_all(&mut world);
    assert_eq!(world.len(), 16);
    world
        .chunks()
        .flat_map(|chunk| chunk.voxels().iter().copied())
        .collect()
}

#[test]
fn banded_gradient_chunks_show_every_band() {
    let voxels = generate_slab(GeneratorSettings::legacy());
    // Red drops to zero only in the second band and blue only in the third.
    let bands: HashSet<u8> = voxels
        .iter()
        .map(|voxel| match (voxel.r, voxel.b) {
            (_, 0) => 2,
            (0, _) => 1,
            _ => 0,
        })
        .collect();
    assert_eq!(bands.len(), 3, "bands seen: {bands:?}");
    assert!(voxels.iter().any(|voxel| voxel.value < 255 - 2 * BAND_WIDTH));
}

#[test]
fn default_density_reaches_the_clamp() {
    let voxels = generate_slab(GeneratorSettings::default());
    assert!(voxels.iter().any(|voxel| voxel.value == 255));
    assert!(voxels.iter().any(|voxel| voxel.value < 32));
}

#[test]
fn hsv_wheel_chunks_cover_several_hue_sectors() {
    let voxels = generate_slab(GeneratorSettings::default());
    // Each sector of the wheel has its own strongest and weakest channel.
    let sectors: HashSet<(usize, usize)> = voxels
        .iter()
        .map(|voxel| {
            let rgb = voxel.rgb();
            let strongest = (0..3).max_by_key(|&c| rgb[c]).unwrap();
            let weakest = (0..3).min_by_key(|&c| rgb[c]).unwrap();
            (strongest, weakest)
        })
        .collect();
    assert!(sectors.len() > 2, "sectors seen: {sectors:?}");
}

#[test]
fn terrain_surface_height_varies_widely() {
    let settings = GeneratorSettings::terrain();
    let sampler = NoiseSampler::new(Seed(42), &settings.fractal);
    let density = DensityFunction::new(settings.mode, settings.density, settings.terrain);
    // Highest non-empty voxel of each column over a 512 x 512 area, every 16 voxels.
    let heights: Vec<i32> = (0..32)
        .flat_map(|z| (0..32).map(move |x| (x * 16, z * 16)))
        .map(|(x, z)| {
            (0..=192)
                .rev()
                .find(|&y| density.evaluate(&sampler, Point3::new(x, y, z)) > 0)
                .unwrap_or(0)
        })
        .collect();
    let lowest = heights.iter().min().unwrap();
    let highest = heights.iter().max().unwrap();
    assert!(highest - lowest > 48, "surface spans {lowest}..={highest}");
}
