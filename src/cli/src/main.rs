pub fn main() -> anyhow::Result<()> {
    aiwatch_cli::run()
}
