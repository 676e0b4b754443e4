//! Chunk Data and Update Light packet assembly: paletted-bitpacked sections, the
//! `MOTION_BLOCKING` heightmap, and the sky-light arrays that ride alongside it.

use mc_binary::nbt::NbtWriter;
use mc_binary::varint;

use crate::worldgen::{self, find_trees, get_block, max_tree_dy, terrain_height, TreeInfo, MIN_Y, NUM_SECTIONS, PI_AIR, SEA_LEVEL};

type Heights = [[i32; 16]; 16];

fn write_air_section(buf: &mut Vec<u8>) {
    buf.extend_from_slice(&0i16.to_be_bytes());
    buf.push(0);
    varint::encode_i32(PI_AIR as i32, buf);
    varint::encode_i32(0, buf);
    buf.push(0);
    varint::encode_i32(0, buf);
    varint::encode_i32(0, buf);
}

/// Encodes one 16x16x16 section. Sections whose base is above every candidate surface (terrain,
/// sea level, tree canopy) in view short-circuit to the single-value-palette air form.
fn write_section(buf: &mut Vec<u8>, cx: i32, cz: i32, section_index: i32, heights: &Heights, trees: &[TreeInfo]) {
    let base_y = section_index * 16 + MIN_Y;

    let mut max_h = i32::MIN;
    for column in heights.iter() {
        for &h in column.iter() {
            if h < SEA_LEVEL && SEA_LEVEL > max_h {
                max_h = SEA_LEVEL;
            }
            if h > max_h {
                max_h = h;
            }
        }
    }
    for tree in trees {
        let top = tree.ground + 5;
        if top > max_h {
            max_h = top;
        }
    }

    if base_y > max_h + 1 {
        write_air_section(buf);
        return;
    }

    let mut block_count: i32 = 0;
    let mut longs = [0i64; 256];

    for y in 0..16usize {
        for z in 0..16usize {
            for x in 0..16usize {
                let wx = cx * 16 + x as i32;
                let wy = base_y + y as i32;
                let wz = cz * 16 + z as i32;
                let pi = get_block(wx, wy, wz, heights[x][z], trees);
                if pi != PI_AIR {
                    block_count += 1;
                }
                let idx = x + z * 16 + y * 256;
                longs[idx / 16] |= ((pi as i64) & 0xF) << ((idx % 16) * 4);
            }
        }
    }

    if block_count == 0 {
        write_air_section(buf);
        return;
    }

    buf.extend_from_slice(&(block_count as i16).to_be_bytes());
    buf.push(4);
    varint::encode_i32(worldgen::PALETTE_SIZE as i32, buf);
    for id in worldgen::PALETTE {
        varint::encode_i32(id, buf);
    }
    varint::encode_i32(256, buf);
    for value in longs {
        buf.extend_from_slice(&value.to_be_bytes());
    }

    buf.push(0);
    varint::encode_i32(0, buf);
    varint::encode_i32(0, buf);
}

fn compute_sky_light(section_index: i32, sky_h: &Heights) -> [u8; 2048] {
    let base_y = section_index * 16 + MIN_Y;
    let mut light = [0u8; 2048];
    for y in 0..16usize {
        for z in 0..16usize {
            for x in 0..16usize {
                let wy = base_y + y as i32;
                let sky: u8 = if wy > sky_h[x][z] { 15 } else { 0 };
                let idx = x + z * 16 + y * 256;
                if idx & 1 == 1 {
                    light[idx / 2] |= sky << 4;
                } else {
                    light[idx / 2] |= sky;
                }
            }
        }
    }
    light
}

fn pack_heightmap(sky_h: &Heights) -> [i64; 37] {
    let mut longs = [0i64; 37];
    for z in 0..16usize {
        for x in 0..16usize {
            let col = x + z * 16;
            let value = (sky_h[x][z] - MIN_Y + 1).max(0);
            longs[col / 7] |= ((value as i64) & 0x1FF) << ((col % 7) * 9);
        }
    }
    longs
}

/// Builds the full Chunk Data and Update Light payload (everything after the packet id) for
/// chunk column `(cx, cz)`.
pub fn build_chunk_payload(cx: i32, cz: i32) -> Vec<u8> {
    let mut heights: Heights = [[0; 16]; 16];
    for z in 0..16usize {
        for x in 0..16usize {
            heights[x][z] = terrain_height(cx * 16 + x as i32, cz * 16 + z as i32);
        }
    }

    let trees = find_trees(cx, cz);

    let mut sky_h: Heights = [[0; 16]; 16];
    for z in 0..16usize {
        for x in 0..16usize {
            let mut h = heights[x][z].max(SEA_LEVEL);
            for tree in &trees {
                let dx = (cx * 16 + x as i32) - tree.bx;
                let dz = (cz * 16 + z as i32) - tree.bz;
                if let Some(mdy) = max_tree_dy(dx, dz) {
                    let ty = tree.ground + 1 + mdy;
                    if ty > h {
                        h = ty;
                    }
                }
            }
            sky_h[x][z] = h;
        }
    }

    let mut sections = Vec::new();
    for section_index in 0..NUM_SECTIONS {
        write_section(&mut sections, cx, cz, section_index, &heights, &trees);
    }

    let heightmap = pack_heightmap(&sky_h);

    let mut payload = Vec::new();
    payload.extend_from_slice(&cx.to_be_bytes());
    payload.extend_from_slice(&cz.to_be_bytes());

    let mut nbt = NbtWriter::root_compound(&mut payload);
    nbt.long_array("MOTION_BLOCKING", &heightmap);
    nbt.end();

    varint::encode_i32(sections.len() as i32, &mut payload);
    payload.extend_from_slice(&sections);
    varint::encode_i32(0, &mut payload); // block entities

    varint::encode_i32(1, &mut payload);
    payload.extend_from_slice(&0x0Ei64.to_be_bytes()); // sky_mask: sections 0, 1, 2 present
    varint::encode_i32(0, &mut payload); // block_light_mask: none
    varint::encode_i32(1, &mut payload);
    payload.extend_from_slice(&0x01i64.to_be_bytes()); // empty_sky_light_mask: section below -64
    varint::encode_i32(1, &mut payload);
    payload.extend_from_slice(&0x03FFFFFFi64.to_be_bytes()); // empty_block_light_mask: all 26

    varint::encode_i32(3, &mut payload);
    for section_index in 0..2 {
        let light = compute_sky_light(section_index, &sky_h);
        varint::encode_i32(2048, &mut payload);
        payload.extend_from_slice(&light);
    }
    let full_daylight = [0xFFu8; 2048]; // section 2 sits entirely above every sky_h column
    varint::encode_i32(2048, &mut payload);
    payload.extend_from_slice(&full_daylight);

    varint::encode_i32(0, &mut payload); // block light arrays: none

    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_section_is_fifteen_bytes() {
        let mut buf = Vec::new();
        write_air_section(&mut buf);
        assert_eq!(buf.len(), 15);
        assert_eq!(buf, vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn fully_populated_section_matches_formula() {
        let heights: Heights = [[300; 16]; 16];
        let trees: Vec<TreeInfo> = Vec::new();
        let mut buf = Vec::new();
        write_section(&mut buf, 0, 0, 0, &heights, &trees);

        let palette_bytes: usize = worldgen::PALETTE.iter().map(|id| mc_binary::varint::size_of_i32(*id)).sum();
        let expected = 2
            + 1
            + mc_binary::varint::size_of_i32(worldgen::PALETTE_SIZE as i32)
            + palette_bytes
            + mc_binary::varint::size_of_i32(256)
            + 256 * 8
            + 1
            + 1
            + 1;
        assert_eq!(buf.len(), expected);
    }

    #[test]
    fn heightmap_packs_column_at_expected_shift() {
        let mut sky_h: Heights = [[-64; 16]; 16];
        sky_h[0][0] = 70;
        let longs = pack_heightmap(&sky_h);
        // column (0,0) is column index 0: long[0], shift 0.
        assert_eq!(longs[0] & 0x1FF, 135);
    }

    #[test]
    fn sky_light_is_dark_at_and_below_sky_height_and_lit_above() {
        let mut sky_h: Heights = [[-64; 16]; 16]; // MIN_Y, so section 0 (base -64) sits at the boundary
        sky_h[0][0] = MIN_Y;
        let light = compute_sky_light(0, &sky_h);
        // cell (0,0,0): wy = -64, not > sky_h=-64, so dark.
        assert_eq!(light[0] & 0x0F, 0);
    }

    #[test]
    fn chunk_payload_starts_with_column_coordinates() {
        let payload = build_chunk_payload(3, -2);
        assert_eq!(&payload[0..4], &3i32.to_be_bytes());
        assert_eq!(&payload[4..8], &(-2i32).to_be_bytes());
    }
}
