use std::fs::{File, OpenOptions};
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ChannelConfig;
use crate::error::{Result, TransportError};
#[cfg(unix)]
use crate::termios;

/// An open serial channel. Implements `Write`.
///
/// The handle is owned exclusively by whoever holds the channel and is
/// released when the channel is dropped or [`closed`](SerialChannel::close).
/// Writes block; no per-write timeout is applied.
pub struct SerialChannel {
    file: File,
    path: PathBuf,
    tty: bool,
}

impl SerialChannel {
    /// Open an existing device with the default config (2 s settle, 115200 baud).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, &ChannelConfig::default())
    }

    /// Open a device (or capture file) with explicit config.
    ///
    /// A tty is put into raw 8N1 mode at `config.baud_rate` before this
    /// returns.
    pub fn open_with_config(path: impl AsRef<Path>, config: &ChannelConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        #[cfg(unix)]
        let speed = termios::speed(config.baud_rate)
            .ok_or(TransportError::UnsupportedBaud(config.baud_rate))?;

        if path.is_dir() {
            return Err(TransportError::NotADevice(path));
        }

        let mut options = OpenOptions::new();
        options
            .write(true)
            .create(config.create)
            .truncate(config.create);
        // Without CLOCAL set yet, a blocking open can wait for carrier.
        #[cfg(unix)]
        options.custom_flags(libc::O_NOCTTY | libc::O_NONBLOCK);

        let file = options.open(&path).map_err(|source| TransportError::Open {
            path: path.clone(),
            source,
        })?;

        #[cfg(unix)]
        let tty = {
            let configure = |source: std::io::Error| TransportError::Configure {
                path: path.clone(),
                source,
            };
            termios::set_blocking(&file).map_err(configure)?;
            let tty = termios::is_tty(&file);
            if tty {
                termios::make_raw(&file, speed).map_err(configure)?;
            }
            tty
        };
        #[cfg(not(unix))]
        let tty = false;

        debug!(
            ?path,
            create = config.create,
            tty,
            baud = config.baud_rate,
            "opened serial channel"
        );

        if !config.settle_delay.is_zero() {
            debug!(delay = ?config.settle_delay, "waiting for device to settle");
            std::thread::sleep(config.settle_delay);
        }

        Ok(Self { file, path, tty })
    }

    /// The path this channel was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the channel is a terminal device rather than a regular file.
    pub fn is_tty(&self) -> bool {
        self.tty
    }

    /// Flush pending bytes, wait for a tty to drain, and release the handle.
    pub fn close(mut self) -> Result<()> {
        self.file.flush()?;
        #[cfg(unix)]
        if self.tty {
            termios::drain(&self.file)?;
        }
        debug!(path = ?self.path, "closed serial channel");
        Ok(())
    }
}

impl Write for SerialChannel {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl std::fmt::Debug for SerialChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialChannel")
            .field("path", &self.path)
            .field("tty", &self.tty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::{DEFAULT_BAUD_RATE, DEFAULT_SETTLE_DELAY};

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("specwire-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn capture_file_receives_bytes() {
        let dir = temp_dir("capture");
        let path = dir.join("capture.bin");

        let mut channel = SerialChannel::open_with_config(&path, &ChannelConfig::capture()).unwrap();
        channel.write_all(&[0xFF, 0x05, 0x0C]).unwrap();
        channel.close().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![0xFF, 0x05, 0x0C]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn capture_truncates_previous_contents() {
        let dir = temp_dir("truncate");
        let path = dir.join("capture.bin");
        std::fs::write(&path, b"stale-bytes").unwrap();

        let mut channel = SerialChannel::open_with_config(&path, &ChannelConfig::capture()).unwrap();
        channel.write_all(&[0x01]).unwrap();
        drop(channel);

        assert_eq!(std::fs::read(&path).unwrap(), vec![0x01]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_device_is_open_error() {
        let dir = temp_dir("missing");
        let path = dir.join("ttyMISSING0");
        let config = ChannelConfig {
            settle_delay: Duration::ZERO,
            ..ChannelConfig::default()
        };

        let err = SerialChannel::open_with_config(&path, &config).unwrap_err();
        match err {
            TransportError::Open { path: failed, source } => {
                assert_eq!(failed, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn directory_is_rejected() {
        let dir = temp_dir("dir");
        let err = SerialChannel::open_with_config(&dir, &ChannelConfig::capture()).unwrap_err();
        assert!(matches!(err, TransportError::NotADevice(_)));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn default_config_waits_for_settle() {
        let config = ChannelConfig::default();
        assert_eq!(config.settle_delay, DEFAULT_SETTLE_DELAY);
        assert_eq!(config.baud_rate, DEFAULT_BAUD_RATE);
        assert!(!config.create);
    }

    #[test]
    fn capture_file_is_not_a_tty() {
        let dir = temp_dir("not-tty");
        let channel =
            SerialChannel::open_with_config(dir.join("capture.bin"), &ChannelConfig::capture())
                .unwrap();
        assert!(!channel.is_tty());
        channel.close().unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn unsupported_baud_is_rejected_before_open() {
        let dir = temp_dir("baud");
        let path = dir.join("capture.bin");
        let config = ChannelConfig {
            baud_rate: 12_345,
            ..ChannelConfig::capture()
        };

        let err = SerialChannel::open_with_config(&path, &config).unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedBaud(12_345)));
        assert!(!path.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    /// Master side and slave path of a fresh pseudo-terminal.
    #[cfg(target_os = "linux")]
    fn open_pty() -> (File, PathBuf) {
        use std::ffi::CStr;
        use std::os::fd::FromRawFd;

        // SAFETY: plain libc calls on a descriptor this test owns; `name` is a
        // writable buffer of the length passed to `ptsname_r`.
        unsafe {
            let master = libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY);
            assert!(master >= 0, "posix_openpt failed");
            assert_eq!(libc::grantpt(master), 0);
            assert_eq!(libc::unlockpt(master), 0);

            let mut name = [0 as libc::c_char; 128];
            assert_eq!(libc::ptsname_r(master, name.as_mut_ptr(), name.len()), 0);
            let slave = CStr::from_ptr(name.as_ptr()).to_str().unwrap().to_owned();

            (File::from_raw_fd(master), PathBuf::from(slave))
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn tty_bytes_reach_the_line_untranslated() {
        use std::io::Read;

        let (mut master, slave) = open_pty();
        let config = ChannelConfig {
            settle_delay: Duration::ZERO,
            ..ChannelConfig::default()
        };
        let mut channel = SerialChannel::open_with_config(&slave, &config).unwrap();
        assert!(channel.is_tty());

        channel.write_all(&[0xFF, 0x0A, 0x0C, 0x0D]).unwrap();
        channel.flush().unwrap();

        let mut received = [0u8; 4];
        master.read_exact(&mut received).unwrap();
        assert_eq!(received, [0xFF, 0x0A, 0x0C, 0x0D]);

        channel.close().unwrap();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn tty_is_raw_8n1_at_configured_speed() {
        use std::os::fd::AsRawFd;

        let (_master, slave) = open_pty();
        let config = ChannelConfig {
            settle_delay: Duration::ZERO,
            baud_rate: 9600,
            ..ChannelConfig::default()
        };
        let channel = SerialChannel::open_with_config(&slave, &config).unwrap();

        // SAFETY: `attrs` is writable storage for one termios and the
        // descriptor stays open for the duration of the call.
        let attrs = unsafe {
            let mut attrs = std::mem::MaybeUninit::<libc::termios>::uninit();
            assert_eq!(libc::tcgetattr(channel.file.as_raw_fd(), attrs.as_mut_ptr()), 0);
            attrs.assume_init()
        };

        assert_eq!(attrs.c_oflag & libc::OPOST, 0);
        assert_eq!(attrs.c_cflag & libc::CSIZE, libc::CS8);
        assert_eq!(attrs.c_cflag & (libc::PARENB | libc::CSTOPB), 0);
        // SAFETY: `attrs` is an initialized termios.
        assert_eq!(unsafe { libc::cfgetospeed(&attrs) }, libc::B9600);
        drop(channel);
    }

    #[test]
    fn debug_shows_path() {
        let dir = temp_dir("debug");
        let path = dir.join("capture.bin");
        let channel = SerialChannel::open_with_config(&path, &ChannelConfig::capture()).unwrap();
        assert!(format!("{channel:?}").contains("capture.bin"));
        assert_eq!(channel.path(), path.as_path());
        drop(channel);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
