use planet_hero::{PlanetConfig, flow};

fn main() -> anyhow::Result<()> {
    let config = PlanetConfig::default().with_title("Planet hero");
    flow::run(config)
}
