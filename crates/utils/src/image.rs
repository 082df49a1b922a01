use crate::dpi::Dpi;
use std::path::Path;
use std::process::Command;

pub fn convert_eps_to_png<P: AsRef<Path>, Q: AsRef<Path>>(
    p: P,
    output: Q,
    dpi: &Dpi,
) -> Result<(), Box<dyn std::error::Error>> {
    let p = p.as_ref();
    let o = output.as_ref();
    let proc = Command::new("gs")
        .arg("-dSAFER")
        .arg("-dBATCH")
        .arg("-dNOPAUSE")
        .arg("-dEPSCrop")
        .arg("-sDEVICE=png16m")
        .arg(format!("-r{}", dpi))
        .arg(format!("-sOutputFile={}", o.display()))
        .arg(p)
        .output()?;

    if !proc.status.success() {
        return Err(format!(
            "Failed to convert EPS to PNG: {}",
            String::from_utf8_lossy(&proc.stderr)
        )
        .into());
    }

    Ok(())
}
