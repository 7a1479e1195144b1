use anyhow::Result;

fn main() -> Result<()> {
    annotate_genome::cli::run()
}
