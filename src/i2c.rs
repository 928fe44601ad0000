use std::process::{Command, Output};

use log::debug;

use crate::transport::{I2cTransport, TransportError};

/// Transport backed by the `i2c-tools` command line utilities.
///
/// Each trait call spawns one `i2cdetect`/`i2cget`/`i2cset` process and
/// blocks on it. The tools must be installed and the calling user must be
/// allowed to open the bus device node.
#[derive(Debug, Default)]
pub struct I2cTools;

impl I2cTools {
    pub fn new() -> Self {
        Self
    }
}

impl I2cTransport for I2cTools {
    fn probe(&mut self, bus: u32, address: u8) -> Result<(), TransportError> {
        let mut cmd = Command::new("i2cdetect");
        cmd.arg("-y")
            .arg(bus.to_string())
            .arg(format!("0x{address:02x}"))
            .arg(format!("0x{address:02x}"));
        run(cmd)?;
        Ok(())
    }

    fn read_byte(
        &mut self,
        bus: u32,
        address: u8,
        register: u8,
    ) -> Result<u8, TransportError> {
        let mut cmd = Command::new("i2cget");
        cmd.arg("-y")
            .arg(bus.to_string())
            .arg(format!("0x{address:02x}"))
            .arg(format!("0x{register:02x}"));
        let rendered = render(&cmd);
        let output = run(cmd)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_byte(&stdout).ok_or_else(|| TransportError::Parse {
            command: rendered,
            output: stdout.into_owned(),
        })
    }

    fn write_byte(
        &mut self,
        bus: u32,
        address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), TransportError> {
        let mut cmd = Command::new("i2cset");
        cmd.arg("-y")
            .arg(bus.to_string())
            .arg(format!("0x{address:02x}"))
            .arg(format!("0x{register:02x}"))
            .arg(format!("0x{value:02x}"));
        run(cmd)?;
        Ok(())
    }

    fn write_raw(
        &mut self,
        bus: u32,
        address: u8,
        value: u8,
    ) -> Result<(), TransportError> {
        let mut cmd = Command::new("i2cset");
        cmd.arg("-y")
            .arg(bus.to_string())
            .arg(format!("0x{address:02x}"))
            .arg(format!("0x{value:02x}"));
        run(cmd)?;
        Ok(())
    }
}

/// Run one bus tool to completion, echoing the command and its output at
/// debug level. A non-zero exit is an error.
fn run(mut cmd: Command) -> Result<Output, TransportError> {
    let rendered = render(&cmd);
    let output = cmd.output().map_err(|source| TransportError::Spawn {
        command: rendered.clone(),
        source,
    })?;
    debug!(
        "cmd = {}; retval = {}",
        rendered,
        String::from_utf8_lossy(&output.stdout).trim_end()
    );
    if !output.status.success() {
        return Err(TransportError::CommandFailed {
            command: rendered,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr)
                .trim_end()
                .to_string(),
        });
    }
    Ok(output)
}

fn render(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(
        cmd.get_args()
            .map(|arg| arg.to_string_lossy().into_owned()),
    );
    parts.join(" ")
}

/// Parse `i2cget` output, a hex byte like `0x65` followed by a newline.
fn parse_byte(raw: &str) -> Option<u8> {
    let text = raw.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u8::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_byte_test() {
        assert_eq!(parse_byte("0x65\n"), Some(0x65));
        assert_eq!(parse_byte("0X65"), Some(0x65));
        assert_eq!(parse_byte("65"), Some(0x65));
        assert_eq!(parse_byte("0x00"), Some(0));
        assert_eq!(parse_byte("0xff\n"), Some(0xff));

        assert_eq!(parse_byte(""), None);
        assert_eq!(parse_byte("\n"), None);
        assert_eq!(parse_byte("Error: Read failed"), None);
        assert_eq!(parse_byte("0x100"), None);
    }

    #[test]
    fn render_test() {
        let mut cmd = Command::new("i2cset");
        cmd.arg("-y").arg("0").arg("0x40").arg("0x06");
        assert_eq!(render(&cmd), "i2cset -y 0 0x40 0x06");
    }
}
