//! Rich header recovery
//!
//! The Rich header is an undocumented, XOR-masked block Microsoft linkers
//! leave between the DOS stub and the NT headers. It records the tools
//! (product id, build id, use count) that produced the binary. goblin does
//! not decode it, so the adapter scans for the `Rich` marker itself, reads
//! the XOR key that follows it, and walks backwards until it reaches the
//! masked `DanS` start marker.

use super::model::{RichEntry, RichHeaderInfo};

/// "DanS", the start-of-header sentinel, as a little-endian dword.
const DANS_MARKER: u32 = 0x536e_6144;

/// Scan the region before the NT headers for a Rich header.
///
/// Returns `None` when no `Rich` marker is found or the block does not
/// walk back to a `DanS` sentinel. Entries are returned in file order;
/// the zeroed checksum padding after `DanS` is dropped.
pub fn scan(bytes: &[u8], nt_offset: usize) -> Option<RichHeaderInfo> {
    let end = nt_offset.min(bytes.len());
    let region = &bytes[..end];

    let rich_at = region.windows(4).position(|w| w == b"Rich")?;
    let xor_key = read_u32(region, rich_at + 4)?;

    let mut entries = Vec::new();
    let mut offset = rich_at;
    let mut found_dans = false;
    while offset >= 8 {
        offset -= 8;
        let id = read_u32(region, offset)? ^ xor_key;
        let count = read_u32(region, offset + 4)? ^ xor_key;

        if id == DANS_MARKER {
            found_dans = true;
            break;
        }
        if id == 0 && count == 0 {
            continue;
        }
        entries.push(RichEntry {
            product_id: (id >> 16) as u16,
            build_id: (id & 0xffff) as u16,
            use_count: count,
        });
    }

    if !found_dans {
        return None;
    }

    entries.reverse();
    Some(RichHeaderInfo { xor_key, entries })
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let slice = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes(slice.try_into().ok()?))
}
