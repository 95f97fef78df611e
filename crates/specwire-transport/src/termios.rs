//! Raw line settings for tty devices.

use std::fs::File;
use std::io;
use std::mem::MaybeUninit;
use std::os::fd::AsRawFd;

/// The termios speed constant for `baud`, if there is one.
pub(crate) fn speed(baud: u32) -> Option<libc::speed_t> {
    let speed = match baud {
        1200 => libc::B1200,
        2400 => libc::B2400,
        4800 => libc::B4800,
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        230400 => libc::B230400,
        _ => return None,
    };
    Some(speed)
}

pub(crate) fn is_tty(file: &File) -> bool {
    // SAFETY: `isatty` only inspects the descriptor, which `file` keeps open.
    unsafe { libc::isatty(file.as_raw_fd()) == 1 }
}

/// Switch the descriptor back to blocking writes after a non-blocking open.
pub(crate) fn set_blocking(file: &File) -> io::Result<()> {
    let fd = file.as_raw_fd();

    // SAFETY: F_GETFL/F_SETFL on an open descriptor owned by `file`.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: as above.
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags & !libc::O_NONBLOCK) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Put the tty into raw 8N1 mode at `speed`.
///
/// Output post-processing is off afterwards, so 0x0A leaves as 0x0A and no
/// byte is added or dropped on the way to the line.
pub(crate) fn make_raw(file: &File, speed: libc::speed_t) -> io::Result<()> {
    let fd = file.as_raw_fd();

    let mut attrs = MaybeUninit::<libc::termios>::uninit();
    // SAFETY: `attrs` is writable storage for one termios and `fd` is open.
    if unsafe { libc::tcgetattr(fd, attrs.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: tcgetattr succeeded, so `attrs` is initialized.
    let mut attrs = unsafe { attrs.assume_init() };

    // SAFETY: `attrs` is an initialized termios owned by this frame.
    unsafe { libc::cfmakeraw(&mut attrs) };
    attrs.c_cflag &= !(libc::PARENB | libc::CSTOPB | libc::CSIZE);
    attrs.c_cflag |= libc::CS8 | libc::CLOCAL | libc::CREAD;

    // SAFETY: as above.
    if unsafe { libc::cfsetispeed(&mut attrs, speed) } != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: as above.
    if unsafe { libc::cfsetospeed(&mut attrs, speed) } != 0 {
        return Err(io::Error::last_os_error());
    }

    // SAFETY: `attrs` is a valid termios and `fd` is open.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &attrs) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Block until every queued byte has left the output buffer.
pub(crate) fn drain(file: &File) -> io::Result<()> {
    loop {
        // SAFETY: `tcdrain` on an open descriptor owned by `file`.
        if unsafe { libc::tcdrain(file.as_raw_fd()) } == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}
