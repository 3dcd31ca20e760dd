//! PNG encoding for rendered figures.
//!
//! Figures are mostly flat-filled bands, so they usually fit in a 256-entry
//! palette and are written as indexed PNG (color type 3). Anti-aliased
//! edges can push past that, in which case RGBA (color type 6) is written.

use rayon::prelude::*;
use resviz_common::{ResvizError, ResvizResult};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

const MAX_PALETTE_SIZE: usize = 256;

/// Images at least this large extract their palette in parallel.
const PARALLEL_THRESHOLD: usize = 4096;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

type Rgba = (u8, u8, u8, u8);

/// Encode RGBA pixels, choosing indexed output when the palette allows.
pub fn create_png_auto(pixels: &[u8], width: usize, height: usize) -> ResvizResult<Vec<u8>> {
    check_len(pixels.len(), width * height * 4)?;
    let palette = if width * height >= PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette_sequential(pixels)
    };
    match palette {
        Some((palette, indices)) => create_png_indexed(width, height, &palette, &indices),
        None => create_png(pixels, width, height),
    }
}

/// Encode RGBA pixels directly (color type 6).
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> ResvizResult<Vec<u8>> {
    check_len(pixels.len(), width * height * 4)?;
    let mut png = Vec::with_capacity(pixels.len() / 4 + 64);
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6));
    let idat = deflate_rows(pixels, width * 4, height)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encode palette indices (color type 3), with a tRNS chunk when needed.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[Rgba],
    indices: &[u8],
) -> ResvizResult<Vec<u8>> {
    check_len(indices.len(), width * height)?;
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(ResvizError::encode(format!(
            "palette has {} entries, expected 1..={}",
            palette.len(),
            MAX_PALETTE_SIZE
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));

    let plte: Vec<u8> = palette.iter().flat_map(|&(r, g, b, _)| [r, g, b]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|&(_, _, _, a)| a < 255) {
        let trns: Vec<u8> = palette.iter().map(|&(_, _, _, a)| a).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_rows(indices, width, height)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encode and write to `path`.
pub fn write_png<P: AsRef<Path>>(path: P, pixels: &[u8], width: usize, height: usize) -> ResvizResult<()> {
    let bytes = create_png_auto(pixels, width, height)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn check_len(actual: usize, expected: usize) -> ResvizResult<()> {
    if actual != expected {
        return Err(ResvizError::shape_mismatch("pixel buffer", expected, actual));
    }
    Ok(())
}

fn ihdr(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&(width as u32).to_be_bytes());
    data.extend_from_slice(&(height as u32).to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.extend_from_slice(&[0, 0, 0]); // compression, filter, interlace
    data
}

#[inline(always)]
fn pack_color(px: &[u8]) -> u32 {
    u32::from_le_bytes([px[0], px[1], px[2], px[3]])
}

#[inline(always)]
fn unpack_color(packed: u32) -> Rgba {
    let [r, g, b, a] = packed.to_le_bytes();
    (r, g, b, a)
}

fn extract_palette_sequential(pixels: &[u8]) -> Option<(Vec<Rgba>, Vec<u8>)> {
    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<Rgba> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let packed = pack_color(px);
        let idx = match lookup.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push(unpack_color(packed));
                lookup.insert(packed, idx);
                idx
            }
        };
        indices.push(idx);
    }
    Some((palette, indices))
}

/// Collect distinct colors per chunk in parallel, merge, then map pixels.
fn extract_palette_parallel(pixels: &[u8]) -> Option<(Vec<Rgba>, Vec<u8>)> {
    let chunk_px = (pixels.len() / 4 / rayon::current_num_threads()).max(256);

    let distinct: Vec<u32> = pixels
        .par_chunks(chunk_px * 4)
        .flat_map(|chunk| {
            let mut local: HashMap<u32, ()> = HashMap::with_capacity(MAX_PALETTE_SIZE);
            for px in chunk.chunks_exact(4) {
                local.insert(pack_color(px), ());
                if local.len() > MAX_PALETTE_SIZE {
                    break;
                }
            }
            local.into_keys().collect::<Vec<_>>()
        })
        .collect();

    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<Rgba> = Vec::with_capacity(MAX_PALETTE_SIZE);
    for packed in distinct {
        if lookup.contains_key(&packed) {
            continue;
        }
        if palette.len() >= MAX_PALETTE_SIZE {
            return None;
        }
        lookup.insert(packed, palette.len() as u8);
        palette.push(unpack_color(packed));
    }

    let indices: Vec<u8> = pixels
        .par_chunks_exact(4)
        .map(|px| lookup.get(&pack_color(px)).copied().unwrap_or(0))
        .collect();
    Some((palette, indices))
}

/// Prefix each scanline with filter byte 0 and zlib-compress.
fn deflate_rows(data: &[u8], row_bytes: usize, height: usize) -> ResvizResult<Vec<u8>> {
    let mut raw = Vec::with_capacity(height * (1 + row_bytes));
    for row in data.chunks_exact(row_bytes.max(1)).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&raw)
        .map_err(|e| ResvizError::encode(format!("IDAT compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| ResvizError::encode(format!("IDAT compression failed: {}", e)))
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
