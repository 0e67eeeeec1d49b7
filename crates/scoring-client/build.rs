fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use a vendored protoc binary unless PROTOC is already set
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }
    // Compile the proto file for the scoring client
    tonic_build::compile_protos("../../proto/scoring.proto")?;
    Ok(())
}
