use anyhow::Result;
use orcfile::version::VERSIONS;

/// Print every registered format version, marking the current one
pub fn run() -> Result<()> {
    println!("Registered format versions:");
    for v in VERSIONS {
        let line = format!("  {:<6} (major {}, minor {})", v.name(), v.major(), v.minor());

        #[cfg(feature = "colorized_output")]
        {
            if v.is_current() {
                println!("{} {}", console::style(line).bold(), console::style("current").green());
            } else {
                println!("{}", line);
            }
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            if v.is_current() {
                println!("{} current", line);
            } else {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
