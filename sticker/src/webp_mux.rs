//! In-process RIFF/WebP chunk writer.
//!
//! Only what sticker metadata needs: read the chunk list, promote a simple-format file (`VP8 ` or
//! `VP8L`) to the extended format (`VP8X`), and set or read the `EXIF` chunk.

use std::borrow::Cow;

use crate::error::{Result, StickerError};

const RIFF: &[u8; 4] = b"RIFF";
const WEBP: &[u8; 4] = b"WEBP";
const VP8: &[u8; 4] = b"VP8 ";
const VP8L: &[u8; 4] = b"VP8L";
const VP8X: &[u8; 4] = b"VP8X";
const EXIF: &[u8; 4] = b"EXIF";
const XMP: &[u8; 4] = b"XMP ";

const FLAG_ALPHA: u8 = 0x10;
const FLAG_EXIF: u8 = 0x08;

const VP8X_LEN: usize = 10;
const VP8L_SIGNATURE: u8 = 0x2f;
const VP8_START_CODE: [u8; 3] = [0x9d, 0x01, 0x2a];

#[derive(Debug, Clone)]
struct Chunk<'a> {
    fourcc: [u8; 4],
    data: Cow<'a, [u8]>,
}

impl<'a> Chunk<'a> {
    fn owned(fourcc: &[u8; 4], data: Vec<u8>) -> Self {
        Self {
            fourcc: *fourcc,
            data: Cow::Owned(data),
        }
    }

    fn is(&self, fourcc: &[u8; 4]) -> bool {
        &self.fourcc == fourcc
    }
}

fn embed_err(msg: impl Into<String>) -> StickerError {
    StickerError::Embed(msg.into())
}

fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn parse_chunks(data: &[u8]) -> Result<Vec<Chunk<'_>>> {
    if data.len() < 12 || &data[0..4] != RIFF || &data[8..12] != WEBP {
        return Err(embed_err("not a RIFF/WebP container"));
    }
    let end = 8usize
        .checked_add(le_u32(&data[4..8]) as usize)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| embed_err("RIFF size exceeds the data"))?;

    let mut chunks = Vec::new();
    let mut pos = 12;
    while pos < end {
        if pos + 8 > end {
            return Err(embed_err(format!("truncated chunk header at offset {}", pos)));
        }
        let mut fourcc = [0u8; 4];
        fourcc.copy_from_slice(&data[pos..pos + 4]);
        let size = le_u32(&data[pos + 4..pos + 8]) as usize;
        let start = pos + 8;
        let stop = start
            .checked_add(size)
            .filter(|&stop| stop <= end)
            .ok_or_else(|| embed_err(format!("truncated chunk at offset {}", pos)))?;
        chunks.push(Chunk {
            fourcc,
            data: Cow::Borrowed(&data[start..stop]),
        });
        // Chunks are padded to an even size.
        pos = stop + (size & 1);
    }

    if chunks.is_empty() {
        return Err(embed_err("WebP container has no chunks"));
    }
    Ok(chunks)
}

fn write_chunks(chunks: &[Chunk<'_>]) -> Result<Vec<u8>> {
    let body_len: usize = chunks
        .iter()
        .map(|c| 8 + c.data.len() + (c.data.len() & 1))
        .sum();
    let riff_size = u32::try_from(4 + body_len)
        .map_err(|_| embed_err("WebP container would exceed 4 GiB"))?;

    let mut out = Vec::with_capacity(8 + 4 + body_len);
    out.extend_from_slice(RIFF);
    out.extend_from_slice(&riff_size.to_le_bytes());
    out.extend_from_slice(WEBP);
    for chunk in chunks {
        out.extend_from_slice(&chunk.fourcc);
        // Each chunk length was bounded by riff_size above.
        out.extend_from_slice(&(chunk.data.len() as u32).to_le_bytes());
        out.extend_from_slice(&chunk.data);
        if chunk.data.len() & 1 == 1 {
            out.push(0);
        }
    }
    Ok(out)
}

/// Canvas width, height and alpha hint of a simple-format image chunk.
fn canvas_info(chunk: &Chunk<'_>) -> Result<(u32, u32, bool)> {
    let d = &chunk.data;
    if chunk.is(VP8) {
        if d.len() < 10 || d[3..6] != VP8_START_CODE {
            return Err(embed_err("VP8 chunk is not a key frame"));
        }
        let width = u32::from(u16::from_le_bytes([d[6], d[7]]) & 0x3fff);
        let height = u32::from(u16::from_le_bytes([d[8], d[9]]) & 0x3fff);
        if width == 0 || height == 0 {
            return Err(embed_err("VP8 frame has zero dimensions"));
        }
        Ok((width, height, false))
    } else if chunk.is(VP8L) {
        if d.len() < 5 || d[0] != VP8L_SIGNATURE {
            return Err(embed_err("VP8L chunk has no signature"));
        }
        let bits = le_u32(&d[1..5]);
        let width = (bits & 0x3fff) + 1;
        let height = ((bits >> 14) & 0x3fff) + 1;
        let alpha = (bits >> 28) & 1 == 1;
        Ok((width, height, alpha))
    } else {
        Err(embed_err(format!(
            "unsupported image chunk {:?}",
            String::from_utf8_lossy(&chunk.fourcc)
        )))
    }
}

fn vp8x_chunk(flags: u8, width: u32, height: u32) -> Chunk<'static> {
    let mut data = vec![0u8; VP8X_LEN];
    data[0] = flags;
    data[4..7].copy_from_slice(&(width - 1).to_le_bytes()[..3]);
    data[7..10].copy_from_slice(&(height - 1).to_le_bytes()[..3]);
    Chunk::owned(VP8X, data)
}

/// Returns a new container with `exif` as its only `EXIF` chunk and the EXIF flag set.
pub fn set_exif(webp: &[u8], exif: &[u8]) -> Result<Vec<u8>> {
    let chunks = parse_chunks(webp)?;
    let first = &chunks[0];

    let mut out: Vec<Chunk<'_>> = if first.is(VP8X) {
        if first.data.len() < VP8X_LEN {
            return Err(embed_err("VP8X chunk too short"));
        }
        let mut header = first.data.to_vec();
        header[0] |= FLAG_EXIF;
        let mut out = vec![Chunk::owned(VP8X, header)];
        out.extend(chunks.iter().skip(1).filter(|c| !c.is(EXIF)).cloned());
        out
    } else {
        let (width, height, alpha) = canvas_info(first)?;
        let flags = FLAG_EXIF | if alpha { FLAG_ALPHA } else { 0 };
        let mut out = vec![vp8x_chunk(flags, width, height)];
        out.extend(chunks.iter().filter(|c| !c.is(EXIF)).cloned());
        out
    };

    // EXIF goes after the image data and before XMP.
    let exif_chunk = Chunk::owned(EXIF, exif.to_vec());
    match out.iter().position(|c| c.is(XMP)) {
        Some(idx) => out.insert(idx, exif_chunk),
        None => out.push(exif_chunk),
    }

    write_chunks(&out)
}

/// Returns the payload of the `EXIF` chunk, if the container has one.
pub fn get_exif(webp: &[u8]) -> Result<Option<Vec<u8>>> {
    Ok(parse_chunks(webp)?
        .into_iter()
        .find(|c| c.is(EXIF))
        .map(|c| c.data.into_owned()))
}
