use std::path::PathBuf;

use orrery_framework::AssetLoader;

mod lit_cube;
mod lit_model;
mod solar_system;
mod textured_cubes;

struct DemoDesc {
    name: &'static str,
    run: fn() -> anyhow::Result<()>,
}

const DEMOS: &[DemoDesc] = &[
    DemoDesc {
        name: "solar-system",
        run: solar_system::main,
    },
    DemoDesc {
        name: "textured-cubes",
        run: textured_cubes::main,
    },
    DemoDesc {
        name: "lit-cube",
        run: lit_cube::main,
    },
    DemoDesc {
        name: "lit-model",
        run: lit_model::main,
    },
];

const DEFAULT_DEMO: &str = "solar-system";

fn print_demos() {
    println!("Usage: cargo run [demo_name]");
    println!();
    println!("Available demos:");
    for demo in DEMOS {
        println!("    {}", demo.name);
    }
}

fn find_demo(name: &str) -> Option<&'static DemoDesc> {
    DEMOS.iter().find(|demo| demo.name == name)
}

/// Assets shipped next to this crate.
pub(crate) fn asset_loader() -> AssetLoader {
    AssetLoader::new_local(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources"))
}

pub fn main() -> anyhow::Result<()> {
    let demo_name = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_DEMO.to_owned());

    let Some(demo) = find_demo(&demo_name) else {
        println!("Unknown demo: {}", demo_name);
        println!();
        print_demos();
        return Ok(());
    };

    (demo.run)()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_names_are_unique_and_default_exists() {
        assert!(find_demo(DEFAULT_DEMO).is_some());
        for (i, demo) in DEMOS.iter().enumerate() {
            assert!(DEMOS[i + 1..].iter().all(|other| other.name != demo.name));
        }
        assert!(find_demo("cube").is_none());
    }
}
