/// Program-interface entry points glow does not wrap
///
/// `glGetProgramInterfaceiv` and `glGetProgramResourceName` (OpenGL 4.3) are
/// resolved through the same loader as the glow context. They count and name
/// the resources of every interface, storage blocks and buffer variables
/// included.

use std::ffi::c_void;

use zenith_3d_engine::engine_error;
use zenith_3d_engine::zenith3d::{Error, Result};

const SOURCE: &str = "zenith3d::opengl";

type GetProgramInterfaceIv =
    unsafe extern "system" fn(program: u32, interface: u32, pname: u32, params: *mut i32);

type GetProgramResourceName = unsafe extern "system" fn(
    program: u32,
    interface: u32,
    index: u32,
    buf_size: i32,
    length: *mut i32,
    name: *mut u8,
);

pub(crate) struct ProgramInterfaceQueries {
    get_program_interface_iv: GetProgramInterfaceIv,
    get_program_resource_name: GetProgramResourceName,
}

impl ProgramInterfaceQueries {
    /// Resolve both entry points
    ///
    /// Fails with `InitializationFailed` when the driver does not expose them.
    ///
    /// # Safety
    ///
    /// `loader` must return null or a pointer to the named GL function.
    pub(crate) unsafe fn load<F>(mut loader: F) -> Result<Self>
    where
        F: FnMut(&str) -> *const c_void,
    {
        let interface_iv = Self::resolve(&mut loader, "glGetProgramInterfaceiv")?;
        let resource_name = Self::resolve(&mut loader, "glGetProgramResourceName")?;

        Ok(Self {
            get_program_interface_iv: std::mem::transmute::<*const c_void, GetProgramInterfaceIv>(interface_iv),
            get_program_resource_name: std::mem::transmute::<*const c_void, GetProgramResourceName>(resource_name),
        })
    }

    fn resolve<F>(loader: &mut F, name: &str) -> Result<*const c_void>
    where
        F: FnMut(&str) -> *const c_void,
    {
        let pointer = loader(name);
        if pointer.is_null() {
            let message = format!("{} is not available (OpenGL 4.3 required)", name);
            engine_error!(SOURCE, "{}", message);
            return Err(Error::InitializationFailed(message));
        }
        Ok(pointer)
    }

    /// GL_ACTIVE_RESOURCES of one interface
    pub(crate) fn active_resources(&self, program: u32, interface: u32) -> u32 {
        let mut count = 0i32;
        unsafe {
            (self.get_program_interface_iv)(program, interface, glow::ACTIVE_RESOURCES, &mut count);
        }
        count.max(0) as u32
    }

    /// Name of one resource
    ///
    /// `name_length` is the resource's GL_NAME_LENGTH, null terminator included.
    pub(crate) fn resource_name(&self, program: u32, interface: u32, index: u32, name_length: i32) -> String {
        if name_length <= 0 {
            return String::new();
        }

        let mut buffer = vec![0u8; name_length as usize];
        let mut written = 0i32;
        unsafe {
            (self.get_program_resource_name)(
                program,
                interface,
                index,
                name_length,
                &mut written,
                buffer.as_mut_ptr(),
            );
        }
        buffer.truncate(written.clamp(0, name_length) as usize);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

#[cfg(test)]
#[path = "program_interface_tests.rs"]
mod tests;
