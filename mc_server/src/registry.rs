//! Configuration-phase registry content: the network-NBT entries clients require before they
//! will accept the transition into Play, plus the orchestration that sends the full sequence.

use std::io::Write;

use mc_binary::nbt::NbtWriter;
use mc_binary::primitive::write_string;
use mc_binary::FrameBuffer;
use mc_protocol::configuration::{FeatureFlags, FinishConfiguration, KnownPacks, RegistryData};
use mc_protocol::ClientboundPacket;

use crate::error::{Result, ServerError};

fn dimension_type_entries() -> Vec<u8> {
    let mut entries = Vec::new();
    write_string(&mut entries, "minecraft:overworld", 256);
    entries.push(1);
    let mut nbt = NbtWriter::root_compound(&mut entries);
    nbt.bool("has_skylight", true);
    nbt.bool("has_ceiling", false);
    nbt.bool("ultrawarm", false);
    nbt.bool("natural", true);
    nbt.double("coordinate_scale", 1.0);
    nbt.bool("bed_works", true);
    nbt.bool("respawn_anchor_works", false);
    nbt.int("min_y", -64);
    nbt.int("height", 384);
    nbt.int("logical_height", 384);
    nbt.string("infiniburn", "#minecraft:infiniburn_overworld");
    nbt.string("effects", "minecraft:overworld");
    nbt.float("ambient_light", 0.0);
    nbt.bool("piglin_safe", false);
    nbt.bool("has_raids", true);
    nbt.int("monster_spawn_light_level", 0);
    nbt.int("monster_spawn_block_light_limit", 0);
    nbt.end();
    entries
}

fn biome_entries() -> Vec<u8> {
    let mut entries = Vec::new();
    write_string(&mut entries, "minecraft:plains", 256);
    entries.push(1);
    let mut nbt = NbtWriter::root_compound(&mut entries);
    nbt.bool("has_precipitation", true);
    nbt.float("temperature", 0.8);
    nbt.float("downfall", 0.4);
    nbt.compound("effects");
    nbt.int("sky_color", 7907327);
    nbt.int("fog_color", 12638463);
    nbt.int("water_color", 4159204);
    nbt.int("water_fog_color", 329011);
    nbt.end();
    nbt.end();
    entries
}

fn chat_type_entries() -> Vec<u8> {
    let mut entries = Vec::new();
    write_string(&mut entries, "minecraft:chat", 256);
    entries.push(1);
    let mut nbt = NbtWriter::root_compound(&mut entries);
    nbt.compound("chat");
    nbt.string("translation_key", "chat.type.text");
    nbt.string_list("parameters", &["sender", "content"]);
    nbt.end();
    nbt.compound("narration");
    nbt.string("translation_key", "chat.type.text.narrate");
    nbt.string_list("parameters", &["sender", "content"]);
    nbt.end();
    nbt.end();
    entries
}

struct DamageType {
    id: &'static str,
    msg: &'static str,
    scaling: &'static str,
    exhaustion: f32,
}

const DAMAGE_TYPES: &[DamageType] = &[
    DamageType { id: "minecraft:arrow", msg: "arrow", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:bad_respawn_point", msg: "badRespawnPoint", scaling: "always", exhaustion: 0.1 },
    DamageType { id: "minecraft:cactus", msg: "cactus", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:campfire", msg: "inFire", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:cramming", msg: "cramming", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:dragon_breath", msg: "dragonBreath", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:drown", msg: "drown", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:dry_out", msg: "dryout", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:ender_pearl", msg: "fall", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:explosion", msg: "explosion", scaling: "always", exhaustion: 0.1 },
    DamageType { id: "minecraft:fall", msg: "fall", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:falling_anvil", msg: "anvil", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:falling_block", msg: "fallingBlock", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType {
        id: "minecraft:falling_stalactite",
        msg: "fallingStalactite",
        scaling: "when_caused_by_living_non_player",
        exhaustion: 0.1,
    },
    DamageType { id: "minecraft:fireball", msg: "fireball", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:fireworks", msg: "fireworks", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:fly_into_wall", msg: "flyIntoWall", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:freeze", msg: "freeze", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:generic", msg: "generic", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:generic_kill", msg: "genericKill", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:hot_floor", msg: "hotFloor", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:in_fire", msg: "inFire", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:in_wall", msg: "inWall", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:indirect_magic", msg: "indirectMagic", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:lava", msg: "lava", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:lightning_bolt", msg: "lightningBolt", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:mace_smash", msg: "mace_smash", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:magic", msg: "magic", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:mob_attack", msg: "mob", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:mob_attack_no_aggro", msg: "mob", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:mob_projectile", msg: "mob", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:on_fire", msg: "onFire", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:out_of_world", msg: "outOfWorld", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:outside_border", msg: "outsideBorder", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:player_attack", msg: "player", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:player_explosion", msg: "explosion.player", scaling: "always", exhaustion: 0.1 },
    DamageType { id: "minecraft:sonic_boom", msg: "sonic_boom", scaling: "always", exhaustion: 0.0 },
    DamageType { id: "minecraft:spit", msg: "mob", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:stalagmite", msg: "stalagmite", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:starve", msg: "starve", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:sting", msg: "sting", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:sweet_berry_bush", msg: "sweetBerryBush", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:thorns", msg: "thorns", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:thrown", msg: "thrown", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:trident", msg: "trident", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:unattributed_fireball", msg: "onFire", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:wind_charge", msg: "mob", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
    DamageType { id: "minecraft:wither", msg: "wither", scaling: "when_caused_by_living_non_player", exhaustion: 0.0 },
    DamageType { id: "minecraft:wither_skull", msg: "witherSkull", scaling: "when_caused_by_living_non_player", exhaustion: 0.1 },
];

pub const DAMAGE_TYPE_COUNT: usize = DAMAGE_TYPES.len();

fn damage_type_entries() -> Vec<u8> {
    let mut entries = Vec::new();
    for dt in DAMAGE_TYPES {
        write_string(&mut entries, dt.id, 256);
        entries.push(1);
        let mut nbt = NbtWriter::root_compound(&mut entries);
        nbt.string("message_id", dt.msg);
        nbt.string("scaling", dt.scaling);
        nbt.float("exhaustion", dt.exhaustion);
        nbt.end();
    }
    entries
}

fn painting_variant_entries() -> Vec<u8> {
    let mut entries = Vec::new();
    write_string(&mut entries, "minecraft:kebab", 256);
    entries.push(1);
    let mut nbt = NbtWriter::root_compound(&mut entries);
    nbt.string("asset_id", "minecraft:kebab");
    nbt.int("width", 1);
    nbt.int("height", 1);
    nbt.end();
    entries
}

fn wolf_variant_entries() -> Vec<u8> {
    let mut entries = Vec::new();
    write_string(&mut entries, "minecraft:pale", 256);
    entries.push(1);
    let mut nbt = NbtWriter::root_compound(&mut entries);
    nbt.string("wild_texture", "minecraft:entity/wolf/wolf");
    nbt.string("tame_texture", "minecraft:entity/wolf/wolf_tame");
    nbt.string("angry_texture", "minecraft:entity/wolf/wolf_angry");
    nbt.string("biomes", "minecraft:plains");
    nbt.end();
    entries
}

const EMPTY_REGISTRIES: [&str; 6] = [
    "minecraft:trim_pattern",
    "minecraft:trim_material",
    "minecraft:banner_pattern",
    "minecraft:enchantment",
    "minecraft:jukebox_song",
    "minecraft:instrument",
];

fn send<W: Write>(stream: &mut W, buf: &FrameBuffer) -> Result<()> {
    if !mc_binary::frame::send_frame(stream, buf)? {
        return Err(ServerError::Closed);
    }
    Ok(())
}

fn send_registry<W: Write>(stream: &mut W, buf: &mut FrameBuffer, registry_id: &str, entry_count: i32, entries: &[u8]) -> Result<()> {
    RegistryData { registry_id, entry_count, entries }.write_framed(buf);
    send(stream, buf)?;
    tracing::debug!(registry_id, entry_count, "sent registry data");
    Ok(())
}

/// Sends the full Configuration-phase sequence: Known Packs, the six populated registries,
/// the six empty ones, Feature Flags, then Finish Configuration.
pub fn send_all<W: Write>(stream: &mut W, buf: &mut FrameBuffer) -> Result<()> {
    KnownPacks.write_framed(buf);
    send(stream, buf)?;

    send_registry(stream, buf, "minecraft:dimension_type", 1, &dimension_type_entries())?;
    send_registry(stream, buf, "minecraft:worldgen/biome", 1, &biome_entries())?;
    send_registry(stream, buf, "minecraft:chat_type", 1, &chat_type_entries())?;
    send_registry(stream, buf, "minecraft:damage_type", DAMAGE_TYPE_COUNT as i32, &damage_type_entries())?;
    send_registry(stream, buf, "minecraft:painting_variant", 1, &painting_variant_entries())?;
    send_registry(stream, buf, "minecraft:wolf_variant", 1, &wolf_variant_entries())?;

    for registry_id in EMPTY_REGISTRIES {
        send_registry(stream, buf, registry_id, 0, &[])?;
    }

    tracing::info!("configuration registries sent");

    FeatureFlags { flags: &["minecraft:vanilla"] }.write_framed(buf);
    send(stream, buf)?;

    FinishConfiguration.write_framed(buf);
    send(stream, buf)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_type_table_has_forty_nine_entries() {
        assert_eq!(DAMAGE_TYPE_COUNT, 49);
    }

    #[test]
    fn only_four_entries_use_always_scaling() {
        let always: Vec<&str> = DAMAGE_TYPES.iter().filter(|d| d.scaling == "always").map(|d| d.id).collect();
        assert_eq!(
            always,
            vec!["minecraft:bad_respawn_point", "minecraft:explosion", "minecraft:player_explosion", "minecraft:sonic_boom"]
        );
    }

    #[test]
    fn dimension_type_entry_is_well_formed_nbt() {
        let entries = dimension_type_entries();
        // string id, bool true, then a compound tag opening the NBT root.
        assert_eq!(&entries[0..2], &20u16.to_be_bytes());
        assert_eq!(&entries[2..22], b"minecraft:overworld");
        assert_eq!(entries[22], 1);
        assert_eq!(entries[23], 0x0A);
        assert_eq!(*entries.last().unwrap(), 0x00);
    }
}
