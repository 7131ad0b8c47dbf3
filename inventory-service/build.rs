fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_prost_build::compile_protos("proto/inventory.proto")?;

    println!("cargo:rerun-if-changed=proto/inventory.proto");
    println!("cargo:rerun-if-changed=build.rs");

    Ok(())
}
