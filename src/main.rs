fn main() -> anyhow::Result<()> {
    tacknote::run()?;
    Ok(())
}
