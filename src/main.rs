fn main() -> anyhow::Result<()> {
    artifact_extractor::cli::run()
}
