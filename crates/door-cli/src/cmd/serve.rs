use door_core::config::DoorConfig;

pub fn run(config: DoorConfig, port: u16) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(door_server::serve(config, port))
}
