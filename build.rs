use shadow_rs::ShadowBuilder;

// Embeds git and build metadata for `notify-relay --version`
fn main() -> Result<(), Box<dyn std::error::Error>> {
    ShadowBuilder::builder().build()?;
    Ok(())
}
