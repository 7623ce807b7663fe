//! Canned configuration files and handoff documents.

use std::fs;
use std::io;
use std::path::PathBuf;

use tempfile::TempDir;

/// A handoff document with one built-in and one custom listener.
///
/// The second listener uses an explicit end tag and non-canonical flag
/// tokens.
pub const SAMPLE_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<listeners>
  <!-- written by hand -->
  <listener classname="org.apache.tools.ant.taskdefs.optional.junitlauncher.LegacyXmlResultFormatter" sendSysErr="false" sendSysOut="true"/>
  <listener classname="com.example.CustomListener" sendSysErr="TRUE" sendSysOut="yes" resultFile="custom-report.txt">
  </listener>
</listeners>
"#;

/// A handoff document whose only listener lacks `classname`.
pub const MISSING_CLASSNAME_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<listeners>
  <listener sendSysErr="false" sendSysOut="false"/>
</listeners>
"#;

/// A controller configuration with three listeners, one of them disabled by
/// its `unless` condition.
pub const SAMPLE_CONFIG: &str = r#"
test = "com.example.FooTest"

[properties]
ci = "true"

[[listeners]]
type = "legacy-xml"
if = "ci"
send_sys_out = true

[[listeners]]
type = "legacy-brief"
unless = "ci"

[[listeners]]
classname = "com.example.CustomListener"
result_file = "custom-report.txt"
send_sys_err = true
"#;

/// Write `body` to `config.toml` inside `dir` and return its path.
///
/// # Errors
///
/// Returns any I/O error raised while writing the file.
pub fn write_config(dir: &TempDir, body: &str) -> io::Result<PathBuf> {
    let path = dir.path().join("config.toml");
    fs::write(&path, body)?;
    Ok(path)
}
