fn main() -> anyhow::Result<()> {
    transit_sim::start()
}
