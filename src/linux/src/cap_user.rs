use nix::errno::Errno;

pub const LINUX_CAPABILITY_VERSION_3: u32 = 0x2008_0522;
pub const LINUX_CAPABILITY_U32S_3: usize = 2;

#[repr(C)]
#[derive(Debug)]
struct CapUserHeader {
    version: u32,
    pid: libc::c_int,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
struct CapUserData {
    effective: u32,
    permitted: u32,
    inheritable: u32,
}

/// The three standard capability vectors of a thread, widened to 64 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CapUserVectors {
    pub effective: u64,
    pub permitted: u64,
    pub inheritable: u64,
}

impl CapUserVectors {
    fn from_data(data: &[CapUserData; LINUX_CAPABILITY_U32S_3]) -> Self {
        let join = |lo: u32, hi: u32| (u64::from(hi) << 32) | u64::from(lo);
        Self {
            effective: join(data[0].effective, data[1].effective),
            permitted: join(data[0].permitted, data[1].permitted),
            inheritable: join(data[0].inheritable, data[1].inheritable),
        }
    }

    fn to_data(self) -> [CapUserData; LINUX_CAPABILITY_U32S_3] {
        let split = |v: u64| (v as u32, (v >> 32) as u32);
        let (e0, e1) = split(self.effective);
        let (p0, p1) = split(self.permitted);
        let (i0, i1) = split(self.inheritable);
        [
            CapUserData {
                effective: e0,
                permitted: p0,
                inheritable: i0,
            },
            CapUserData {
                effective: e1,
                permitted: p1,
                inheritable: i1,
            },
        ]
    }
}

fn header(pid: i32) -> CapUserHeader {
    CapUserHeader {
        version: LINUX_CAPABILITY_VERSION_3,
        pid,
    }
}

pub fn capget(pid: i32) -> nix::Result<CapUserVectors> {
    let mut hdr = header(pid);
    let mut data = [CapUserData::default(); LINUX_CAPABILITY_U32S_3];
    let ret = unsafe {
        libc::syscall(
            libc::SYS_capget,
            &mut hdr as *mut CapUserHeader,
            data.as_mut_ptr(),
        )
    };
    Errno::result(ret)?;
    Ok(CapUserVectors::from_data(&data))
}

/// Writes all three vectors in a single syscall. Kernels with file
/// capabilities only accept this for the calling thread.
pub fn capset(pid: i32, vectors: CapUserVectors) -> nix::Result<()> {
    let mut hdr = header(pid);
    let data = vectors.to_data();
    let ret = unsafe {
        libc::syscall(
            libc::SYS_capset,
            &mut hdr as *mut CapUserHeader,
            data.as_ptr(),
        )
    };
    Errno::result(ret).map(drop)
}
