fn main() -> anyhow::Result<()> {
    di_source_generator::build_script::run()?;
    Ok(())
}
