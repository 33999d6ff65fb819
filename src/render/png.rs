//! PNG encoding for 8-bit RGB buffers with a physical resolution chunk.

use std::io::Write;

use anyhow::{bail, Context, Result};
use flate2::{write::ZlibEncoder, Compression};

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];
const INCHES_PER_METRE: f64 = 39.3701;

/// Encodes `pixels` (3 bytes per pixel, row-major) as a PNG tagged with `dpi`.
pub fn encode_rgb(pixels: &[u8], width: u32, height: u32, dpi: u32) -> Result<Vec<u8>> {
    let row_len = width as usize * 3;
    if pixels.len() != row_len * height as usize {
        bail!(
            "pixel buffer holds {} bytes, expected {} for {}x{}",
            pixels.len(),
            row_len * height as usize,
            width,
            height
        );
    }

    let mut png = Vec::with_capacity(pixels.len() / 4);
    png.extend_from_slice(&SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(2); // color type (RGB)
    ihdr.push(0); // compression method
    ihdr.push(0); // filter method
    ihdr.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr);

    let ppm = pixels_per_metre(dpi);
    let mut phys = Vec::with_capacity(9);
    phys.extend_from_slice(&ppm.to_be_bytes());
    phys.extend_from_slice(&ppm.to_be_bytes());
    phys.push(1); // unit: metre
    write_chunk(&mut png, b"pHYs", &phys);

    let idat = deflate_rows(pixels, row_len).context("IDAT compression failed")?;
    write_chunk(&mut png, b"IDAT", &idat);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

pub fn pixels_per_metre(dpi: u32) -> u32 {
    (dpi as f64 * INCHES_PER_METRE).round() as u32
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefixes each scanline with filter type 0 and deflates the lot.
fn deflate_rows(pixels: &[u8], row_len: usize) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    if row_len > 0 {
        for row in pixels.chunks_exact(row_len) {
            encoder.write_all(&[0])?;
            encoder.write_all(row)?;
        }
    }
    encoder.finish()
}

// -- Tests -------------------------------------------------------------------
