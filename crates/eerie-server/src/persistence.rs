//! Mob save file (`mobs.dat`): one little-endian NBT root holding a `Mobs` list.

use std::path::Path;

use bytes::BytesMut;
use eerie_nbt::{NbtError, NbtRoot};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file is not valid NBT: {0}")]
    Nbt(#[from] NbtError),
}

/// Read the save file. A missing file is not an error.
pub fn load_mobs(path: &Path) -> Result<Option<NbtRoot>, PersistenceError> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read(path)?;
    let root = eerie_nbt::read_nbt(&mut data.as_slice())?;
    Ok(Some(root))
}

/// Write the save file, keeping the previous one as `<name>.dat_old`.
pub fn save_mobs(path: &Path, root: &NbtRoot) -> Result<(), PersistenceError> {
    let mut buf = BytesMut::new();
    eerie_nbt::write_nbt(&mut buf, root)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    if path.exists() {
        let backup = path.with_extension("dat_old");
        if let Err(e) = std::fs::copy(path, &backup) {
            warn!(error = %e, "could not back up {}", path.display());
        }
    }
    std::fs::write(path, &buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eerie_game::GameWorld;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("eerie-test-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir.join("mobs.dat")
    }

    #[test]
    fn missing_file_loads_nothing() {
        let path = temp_path("missing");
        assert!(load_mobs(&path).unwrap().is_none());
    }

    #[test]
    fn mobs_survive_a_restart() {
        let path = temp_path("restart");
        let mut gw = GameWorld::with_seed(1, 3);
        gw.spawn_mob("eerie:nether_knight", 0.5, 4.0, 0.5).unwrap();
        gw.spawn_mob("eerie:pumpkin_slime", 4.5, 4.0, 0.5).unwrap();
        save_mobs(&path, &gw.save_mobs()).unwrap();
        // Second save leaves a backup of the first.
        save_mobs(&path, &gw.save_mobs()).unwrap();
        assert!(path.with_extension("dat_old").exists());

        let root = load_mobs(&path).unwrap().unwrap();
        let mut restored = GameWorld::with_seed(100, 3);
        assert_eq!(restored.load_mobs(&root), 2);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn garbage_file_is_an_nbt_error() {
        let path = temp_path("garbage");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, [3u8, 0, 0]).unwrap();
        assert!(matches!(load_mobs(&path), Err(PersistenceError::Nbt(_))));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
