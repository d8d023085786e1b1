use crate::error::{
    CreateOutputSnafu, DecodeOutputSnafu, EncodeOutputSnafu, Error, ReadOutputSnafu,
    WriteOutputSnafu,
};
use nostr_sdk::Event;
use serde::Serialize;
use snafu::ResultExt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes `events` as a one-space indented JSON array followed by a newline,
/// truncating any existing file.
pub fn save_events(path: impl AsRef<Path>, events: &[Event]) -> Result<(), Error> {
    let path = path.as_ref();
    let file = File::create(path).context(CreateOutputSnafu { path })?;
    let mut writer = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    events
        .serialize(&mut serializer)
        .context(EncodeOutputSnafu { path })?;

    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .context(WriteOutputSnafu { path })?;
    Ok(())
}

pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<Event>, Error> {
    let path = path.as_ref();
    let file = File::open(path).context(ReadOutputSnafu { path })?;
    serde_json::from_reader(BufReader::new(file)).context(DecodeOutputSnafu { path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nostr_sdk::{EventBuilder, Keys};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn note(keys: &Keys, content: &str) -> Event {
        EventBuilder::text_note(content).sign_with_keys(keys).unwrap()
    }

    #[test]
    fn test_empty_sequence_is_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        save_events(&path, &[]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
        assert!(load_events(&path).unwrap().is_empty());
    }

    #[test]
    fn test_overwrites_and_preserves_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "stale contents that are much longer than the new file").unwrap();

        let keys = Keys::generate();
        let events = vec![note(&keys, "first"), note(&keys, "second")];
        save_events(&path, &events).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n {\n  \""));
        assert!(raw.ends_with("]\n"));

        let loaded = load_events(&path).unwrap();
        assert_eq!(loaded, events);
        assert!(loaded.iter().all(|e| e.verify().is_ok()));
    }

    #[test]
    fn test_create_failure_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.json");

        let err = save_events(&path, &[]).unwrap_err();
        assert!(matches!(err, Error::CreateOutput { .. }));
        assert!(err.to_string().contains("out.json"));
    }
}
