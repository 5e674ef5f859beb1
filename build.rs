//! Retrieves information about the version of the engine from Git and the build
//! environment. It can be accessed at runtime through the `build` module.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
