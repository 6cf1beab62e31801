use std::ffi::c_void;

use thiserror::Error;

/// A GPU-resident, mipmapped 2D texture bound to one texture unit.
#[derive(Debug)]
pub struct Texture2D {
    id: u32,
    unit: u32,
    width: u32,
    height: u32,
}

impl Texture2D {
    /// Uploads tightly packed RGB8 pixels as a mipmapped 2D texture and
    /// leaves it bound on the given texture unit.
    ///
    /// Wrap mode is repeat on both axes; minification filters through the
    /// mipmap chain, magnification is linear.
    pub fn from_rgb8(
        unit: u32,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self, TextureError> {
        if (width as usize * height as usize * 3) != pixels.len() {
            return Err(TextureError::InvalidSrcLength);
        }

        let mut id = 0;

        unsafe {
            gl::GenTextures(1, (&mut id) as *mut u32);
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(gl::TEXTURE_2D, id);

            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as i32);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                gl::LINEAR_MIPMAP_LINEAR as i32,
            );
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as i32);

            // RGB8 rows are not 4-byte aligned
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);

            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGB8 as i32,
                width as i32,
                height as i32,
                0,
                gl::RGB,
                gl::UNSIGNED_BYTE,
                pixels.as_ptr() as *const c_void,
            );
            gl::GenerateMipmap(gl::TEXTURE_2D);
        }

        Ok(Self {
            id,
            unit,
            width,
            height,
        })
    }

    /// Re-activates and binds the texture on its unit.
    pub fn bind(&self) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + self.unit);
            gl::BindTexture(gl::TEXTURE_2D, self.id);
        }
    }

    pub fn unit(&self) -> u32 {
        self.unit
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, (&self.id) as *const u32);
        }
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Invalid source data length")]
    InvalidSrcLength,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_pixel_buffer_is_rejected() {
        // fails the length check before any driver call
        let err = Texture2D::from_rgb8(0, 4, 4, &[0_u8; 10]).unwrap_err();

        assert!(matches!(err, TextureError::InvalidSrcLength));
    }
}
