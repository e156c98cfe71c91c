use ddsfile::{D3DFormat, DxgiFormat, FourCC};
use thiserror::Error;

use crate::{PixelFormat, Surface, SurfaceError, Tiling};

#[derive(Debug, Error)]
pub enum CreateDdsError {
    #[error("error creating DDS")]
    Dds(#[from] ddsfile::Error),

    #[error("error decoding surface")]
    DecodeSurface(#[from] SurfaceError),

    #[error("the image format of the DDS file is not supported")]
    UnsupportedDdsFormat,
}

impl<T: AsRef<[u8]>> Surface<T> {
    /// Create a DDS file from the surface.
    ///
    /// Linear DXT1 and DXT5 data is stored as BC1 and BC3 without decoding.
    /// All other surfaces are decoded and stored as R8G8B8A8.
    pub fn to_dds(&self) -> Result<ddsfile::Dds, CreateDdsError> {
        self.validate()?;

        let (format, data) = match (self.image_format, self.tiling) {
            (PixelFormat::Dxt1, Tiling::Linear) => (DxgiFormat::BC1_UNorm, self.block_data()),
            (PixelFormat::Dxt5, Tiling::Linear) => (DxgiFormat::BC3_UNorm, self.block_data()),
            _ => (DxgiFormat::R8G8B8A8_UNorm, self.decode_rgba8()?.data),
        };

        let mut dds = ddsfile::Dds::new_dxgi(ddsfile::NewDxgiParams {
            height: self.height,
            width: self.width,
            depth: None,
            format,
            mipmap_levels: None,
            array_layers: None,
            caps2: None,
            is_cubemap: false,
            resource_dimension: ddsfile::D3D10ResourceDimension::Texture2D,
            alpha_mode: ddsfile::AlphaMode::Straight,
        })?;

        dds.data = data;

        Ok(dds)
    }

    // The size is already checked by validate.
    fn block_data(&self) -> Vec<u8> {
        let size = self.size_in_bytes().unwrap_or_default();
        self.data.as_ref()[..size].to_vec()
    }
}

impl Surface<Vec<u8>> {
    /// Create a linear DXT1 or DXT5 surface from the first mip level of `dds`.
    pub fn from_dds(dds: &ddsfile::Dds) -> Result<Self, CreateDdsError> {
        let image_format = dds_pixel_format(dds).ok_or(CreateDdsError::UnsupportedDdsFormat)?;

        let surface = Surface {
            width: dds.get_width(),
            height: dds.get_height(),
            image_format,
            tiling: Tiling::Linear,
            data: dds.data.clone(),
        };
        surface.validate()?;

        // Only keep the base mip level.
        let size = surface.size_in_bytes().unwrap_or_default();
        Ok(Surface {
            data: dds.data[..size].to_vec(),
            ..surface
        })
    }
}

fn dds_pixel_format(dds: &ddsfile::Dds) -> Option<PixelFormat> {
    // The format can be DXGI, D3D, or specified in the FOURCC.
    let dxgi = dds.get_dxgi_format();
    let d3d = dds.get_d3d_format();
    let fourcc = dds.header.spf.fourcc.as_ref();

    dxgi.and_then(pixel_format_from_dxgi)
        .or_else(|| d3d.and_then(pixel_format_from_d3d))
        .or_else(|| fourcc.and_then(pixel_format_from_fourcc))
}

fn pixel_format_from_dxgi(format: DxgiFormat) -> Option<PixelFormat> {
    match format {
        DxgiFormat::BC1_UNorm | DxgiFormat::BC1_UNorm_sRGB => Some(PixelFormat::Dxt1),
        DxgiFormat::BC3_UNorm | DxgiFormat::BC3_UNorm_sRGB => Some(PixelFormat::Dxt5),
        _ => None,
    }
}

fn pixel_format_from_d3d(format: D3DFormat) -> Option<PixelFormat> {
    match format {
        D3DFormat::DXT1 => Some(PixelFormat::Dxt1),
        D3DFormat::DXT5 => Some(PixelFormat::Dxt5),
        _ => None,
    }
}

fn pixel_format_from_fourcc(fourcc: &FourCC) -> Option<PixelFormat> {
    match fourcc.0 {
        FourCC::DXT1 => Some(PixelFormat::Dxt1),
        FourCC::DXT5 => Some(PixelFormat::Dxt5),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dxt1_to_dds_and_back() {
        let data: Vec<u8> = (0..32).collect();
        let surface = Surface {
            width: 8,
            height: 8,
            image_format: PixelFormat::Dxt1,
            tiling: Tiling::Linear,
            data: data.clone(),
        };

        let dds = surface.to_dds().unwrap();
        assert_eq!(Some(DxgiFormat::BC1_UNorm), dds.get_dxgi_format());
        assert_eq!(data, dds.data);

        assert_eq!(surface, Surface::from_dds(&dds).unwrap());
    }

    #[test]
    fn ctr_to_dds_rgba8() {
        let surface = Surface {
            width: 2,
            height: 2,
            image_format: PixelFormat::L8,
            tiling: Tiling::Ctr,
            data: vec![128u8; 64],
        };

        let dds = surface.to_dds().unwrap();
        assert_eq!(Some(DxgiFormat::R8G8B8A8_UNorm), dds.get_dxgi_format());
        assert_eq!([128, 128, 128, 255].repeat(4), dds.data);
    }

    #[test]
    fn from_dds_unsupported_format() {
        let surface = Surface {
            width: 1,
            height: 1,
            image_format: PixelFormat::Rgba8,
            tiling: Tiling::Linear,
            data: vec![0u8; 4],
        };
        let dds = surface.to_dds().unwrap();

        assert!(matches!(
            Surface::from_dds(&dds),
            Err(CreateDdsError::UnsupportedDdsFormat)
        ));
    }
}
