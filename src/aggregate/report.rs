//! Plain-text settings report of a group (`group-<n>/group-simanneal-settings.txt`).
use std::{
    fs::File,
    io::{BufWriter, Write},
};

use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;

use crate::{aggregate::Group, constants::SEPARATOR, telanneal_errors::TelAnnealError};

pub const GROUP_SETTINGS_FILE: &str = "group-simanneal-settings.txt";

pub fn group_settings_report(group: &Group) -> String {
    let config = &group.configuration;
    format!(
        "Rounds in this group all have\n  num_locs = {}\nlocation requests.\n{SEPARATOR}\n\
         Cooling method for this group was:\n{}Run for {} epochs.\n{SEPARATOR}\n\
         This group contains {} rounds, round numbers:\n{}\n",
        config.num_locations,
        config.cooling_description,
        config.last_epoch,
        group.run_ids.len(),
        group.run_ids.iter().join(", ")
    )
}

pub fn write_group_settings<W: Write>(writer: &mut W, group: &Group) -> std::io::Result<()> {
    writer.write_all(group_settings_report(group).as_bytes())
}

/// Write the report under `<summary_dir>/group-<n>/`, creating the folder.
pub fn save_group_settings(
    summary_dir: &Utf8Path,
    group: &Group,
) -> Result<Utf8PathBuf, TelAnnealError> {
    let group_dir = summary_dir.join(format!("group-{}", group.number));
    std::fs::create_dir_all(&group_dir)?;

    let path = group_dir.join(GROUP_SETTINGS_FILE);
    let mut writer = BufWriter::new(File::create(&path)?);
    write_group_settings(&mut writer, group)?;
    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod report_test {
    use super::*;
    use crate::repository::run_record::RunConfiguration;

    #[test]
    fn test_group_settings_report() {
        let group = Group {
            number: 2,
            configuration: RunConfiguration {
                num_locations: 50,
                last_epoch: 10000,
                cooling_description: "Geometric cooling schedule:\n10 * (0.99^epoch)\n".into(),
            },
            run_ids: vec![3, 8, 11],
        };

        let expected = format!(
            "Rounds in this group all have\n  num_locs = 50\nlocation requests.\n{sep}\n\
             Cooling method for this group was:\nGeometric cooling schedule:\n10 * (0.99^epoch)\n\
             Run for 10000 epochs.\n{sep}\nThis group contains 3 rounds, round numbers:\n\
             3, 8, 11\n",
            sep = SEPARATOR
        );
        assert_eq!(group_settings_report(&group), expected);
    }

    #[test]
    fn test_write_group_settings_propagates_errors() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let group = Group {
            number: 1,
            configuration: RunConfiguration {
                num_locations: 5,
                last_epoch: 10,
                cooling_description: String::new(),
            },
            run_ids: vec![1],
        };
        let err = write_group_settings(&mut Closed, &group).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_save_group_settings() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let group = Group {
            number: 1,
            configuration: RunConfiguration {
                num_locations: 5,
                last_epoch: 10,
                cooling_description: String::new(),
            },
            run_ids: vec![1],
        };

        let path = save_group_settings(root, &group).unwrap();
        assert_eq!(path, root.join("group-1").join(GROUP_SETTINGS_FILE));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            group_settings_report(&group)
        );
    }
}
