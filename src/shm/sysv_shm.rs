use crate::shm::ShmTimeSample;

use anyhow::Context;
use anyhow::Result;

use libc::c_int;
use libc::c_uint;
use libc::time_t;

use std::io;
use std::mem;
use std::ptr::NonNull;
use std::sync::atomic::fence;
use std::sync::atomic::Ordering;

use tracing::error;
use tracing::trace;

use volatile_register::RW;

const NTPD_BASE: i32 = 0x4e545030;

// shm_perm.mode bit set once the segment is marked for removal
const SHM_DEST: u32 = 0o1000;

/// ntpd's `struct shmTime`
#[repr(C)]
pub struct Time {
    pub mode: RW<c_int>,
    pub count: RW<c_int>,
    pub clock_sec: RW<time_t>,
    pub clock_usec: RW<c_int>,
    pub receive_sec: RW<time_t>,
    pub receive_usec: RW<c_int>,
    pub leap: RW<c_int>,
    pub precision: RW<c_int>,
    pub nsamples: RW<c_int>,
    pub valid: RW<c_int>,
    pub clock_nsec: RW<c_uint>,
    pub receive_nsec: RW<c_uint>,
    _dummy: [c_int; 8],
}

macro_rules! write {
    ($time: ident, $field:ident, $value:expr) => {
        (*$time).$field.write($value)
    };
}

macro_rules! update {
    ($time: ident, $field:ident, $ex:expr) => {
        (*$time).$field.modify($ex)
    };
}

macro_rules! read {
    ($time: ident, $field:ident) => {
        (*$time).$field.read()
    };
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Key {
    /// ntpd refclock unit, `server 127.127.28.UNIT`
    Unit(i32),
    /// An anonymous segment
    Private,
}

impl Key {
    fn key(&self) -> libc::key_t {
        match self {
            Key::Unit(unit) => NTPD_BASE + unit,
            Key::Private => libc::IPC_PRIVATE,
        }
    }

    // ntpd only trusts root-owned segments for the first two units
    fn permissions(&self) -> c_int {
        match self {
            Key::Unit(unit) if *unit <= 1 => 0o600,
            _ => 0o666,
        }
    }
}

/// An attached NTP shared memory segment
pub struct ShmTime {
    id: c_int,
    time: NonNull<Time>,
    key: Key,
    owner: bool,
}

// The segment is only reached through `&self` reads and `&mut self` writes.
unsafe impl Send for ShmTime {}

impl ShmTime {
    /// Create or attach the segment ntpd reads for `unit`
    pub fn new(unit: i32) -> Result<Self> {
        let key = Key::Unit(unit);
        let id = get_id(key)?;

        attach(id, key, false)
    }

    /// Create an anonymous segment that is removed when this handle is dropped
    pub fn private() -> Result<Self> {
        let id = get_id(Key::Private)?;

        attach(id, Key::Private, true)
    }

    /// Attach an existing segment by id
    pub fn open_id(id: c_int) -> Result<Self> {
        attach(id, Key::Private, false)
    }

    pub fn id(&self) -> c_int {
        self.id
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// Read a sample if `count` moved past `last_count` and no write overlapped the read
    pub fn read(&self, last_count: i32) -> Option<ShmTimeSample> {
        let time = self.time.as_ptr();
        let sample;

        unsafe {
            let count_before = read!(time, count);

            // an odd count is a write in progress
            if count_before == last_count || count_before & 1 == 1 {
                return None;
            }

            fence(Ordering::SeqCst);

            let mode = read!(time, mode);
            let clock_sec = read!(time, clock_sec);
            let clock_usec = read!(time, clock_usec);
            let receive_sec = read!(time, receive_sec);
            let receive_usec = read!(time, receive_usec);
            let leap = read!(time, leap);
            let precision = read!(time, precision);
            let nsamples = read!(time, nsamples);
            let valid = read!(time, valid);
            let clock_nsec = read!(time, clock_nsec);
            let receive_nsec = read!(time, receive_nsec);

            fence(Ordering::SeqCst);

            let count_after = read!(time, count);

            if count_before != count_after {
                // We raced a write
                return None;
            }

            sample = ShmTimeSample {
                mode,
                count: count_after,
                clock_sec,
                clock_usec,
                receive_sec,
                receive_usec,
                leap,
                precision,
                nsamples,
                valid,
                clock_nsec,
                receive_nsec,
            };
        }

        trace!("read NTP sample {:?} count {}", self.key, sample.count);

        Some(sample)
    }

    /// Write `sample` and return the new count.
    ///
    /// `count` is odd while the fields change and even once `valid` is set, so a reader comparing
    /// `count` before and after its read sees any overlap.  `valid` is left set during the write.
    pub fn write(&mut self, sample: &ShmTimeSample) -> i32 {
        let time = self.time.as_ptr();
        let last_count;

        unsafe {
            update!(time, count, |c| c.wrapping_add(1) | 1);

            fence(Ordering::SeqCst);

            write!(time, mode, sample.mode);
            write!(time, clock_sec, sample.clock_sec);
            write!(time, clock_usec, sample.clock_usec);
            write!(time, clock_nsec, sample.clock_nsec);
            write!(time, receive_sec, sample.receive_sec);
            write!(time, receive_usec, sample.receive_usec);
            write!(time, receive_nsec, sample.receive_nsec);
            write!(time, leap, sample.leap);
            write!(time, precision, sample.precision);
            write!(time, nsamples, sample.nsamples);

            fence(Ordering::SeqCst);

            write!(time, valid, 1);

            fence(Ordering::SeqCst);

            update!(time, count, |c| c.wrapping_add(1));

            last_count = read!(time, count);
        }

        trace!(
            "set NTP sample {:?} count {}: {}.{:09}",
            self.key,
            last_count,
            sample.clock_sec,
            sample.clock_nsec
        );

        last_count
    }

    /// True once the segment is marked for removal or can no longer be inspected
    pub fn is_removed(&self) -> bool {
        let mut ds: libc::shmid_ds = unsafe { mem::zeroed() };

        let ok = unsafe { libc::shmctl(self.id, libc::IPC_STAT, &mut ds) };

        if -1 == ok {
            return true;
        }

        (ds.shm_perm.mode as u32) & SHM_DEST != 0
    }

    /// Mark the segment for removal, it goes away after the last detach
    pub fn remove(&self) -> io::Result<()> {
        let ok = unsafe { libc::shmctl(self.id, libc::IPC_RMID, std::ptr::null_mut()) };

        if -1 == ok {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }
}

fn get_id(key: Key) -> Result<c_int> {
    let size = mem::size_of::<Time>();
    let flags = libc::IPC_CREAT | key.permissions();

    let id = unsafe { libc::shmget(key.key(), size, flags) };

    if -1 == id {
        Err(io::Error::last_os_error())
            .with_context(|| format!("Unable to get shared memory for {:?}", key))
    } else {
        Ok(id)
    }
}

fn attach(id: c_int, key: Key, owner: bool) -> Result<ShmTime> {
    let shm = unsafe { libc::shmat(id, std::ptr::null(), 0) };

    if shm as isize == -1 {
        return Err(io::Error::last_os_error())
            .with_context(|| format!("Unable to map shared memory id {} ({:?})", id, key));
    }

    let time = NonNull::new(shm as *mut Time)
        .with_context(|| format!("Shared memory id {} mapped to null", id))?;

    Ok(ShmTime {
        id,
        time,
        key,
        owner,
    })
}

impl Drop for ShmTime {
    fn drop(&mut self) {
        if self.owner {
            if let Err(e) = self.remove() {
                trace!("removing shared memory id {} failed: {}", self.id, e);
            }
        }

        let ok = unsafe { libc::shmdt(self.time.as_ptr() as *const libc::c_void) };

        if -1 == ok {
            error!(
                "unable to unmap shared memory id {} ({:?})",
                self.id,
                io::Error::last_os_error()
            );
        }
    }
}
