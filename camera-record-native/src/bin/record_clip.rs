//! Record a short clip and export it.
//!
//! ```text
//! record-clip [--seconds N] [--out PATH] [--config PATH] [--encrypt-key HEX64] [--camera]
//! ```
//! `--camera` uses a physical camera and needs the `native` feature; without
//! it the synthetic test pattern is recorded.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;

use camera_record_core::storage::metadata;
use camera_record_core::{
    AesGcmEncryptor, ArtifactWriter, CaptureEncryptor, CaptureError, EventLog, ExportResult, HeadlessSurface,
    MediaHost, RecordController, RecorderConfiguration,
};
use camera_record_native::SyntheticCameraHost;

const CLI_KEY_ID: &str = "cli-key";

#[derive(Parser, Debug)]
#[command(name = "record-clip")]
#[command(about = "Record a camera clip and export it with a metadata sidecar")]
#[command(version)]
struct Args {
    /// Recording length in seconds
    #[arg(long, default_value_t = 3)]
    seconds: u64,

    /// Output file; the sidecar is written next to it
    #[arg(long, default_value = "recording.mjpeg")]
    out: PathBuf,

    /// JSON recorder configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// AES-256 key as 64 hex characters; encrypts the exported file
    #[arg(long, value_parser = parse_key)]
    encrypt_key: Option<[u8; 32]>,

    /// Record from a physical camera (requires the `native` feature)
    #[arg(long)]
    camera: bool,
}

fn parse_key(value: &str) -> Result<[u8; 32], String> {
    let bytes = hex::decode(value).map_err(|e| format!("invalid key: {}", e))?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| format!("encryption key must be 32 bytes, got {}", bytes.len()))
}

fn load_config(path: Option<&Path>) -> Result<RecorderConfiguration, CaptureError> {
    let Some(path) = path else {
        return Ok(RecorderConfiguration {
            timeslice_ms: Some(250),
            ..Default::default()
        });
    };
    let json = fs::read_to_string(path)
        .map_err(|e| CaptureError::ConfigurationFailed(format!("failed to read {}: {}", path.display(), e)))?;
    RecorderConfiguration::from_json_str(&json)
}

fn record<H: MediaHost>(host: H, args: &Args, config: RecorderConfiguration) -> Result<ExportResult, CaptureError> {
    let surface = HeadlessSurface::new(config.surface);
    let mut controller = RecordController::new(host, surface, config)?;
    let events = Arc::new(EventLog::new());
    controller.set_delegate(events.clone());

    controller.start_recording()?;
    log::info!("Recording for {}s", args.seconds);

    let deadline = Instant::now() + Duration::from_secs(args.seconds);
    while Instant::now() < deadline && controller.is_recording() {
        controller.process_events();
        std::thread::sleep(Duration::from_millis(50));
    }
    controller.stop_recording()?;

    let artifact = controller
        .wait_for_stop(Duration::from_secs(10))
        .or_else(|| controller.surface().artifact().cloned())
        .ok_or_else(|| CaptureError::RecorderFailed("recorder never stopped".into()))?;

    let encryptor = args
        .encrypt_key
        .map(|key| Box::new(AesGcmEncryptor::new(key, CLI_KEY_ID)) as Box<dyn CaptureEncryptor>);
    let result = ArtifactWriter::new(args.out.clone(), encryptor).write(&artifact)?;
    metadata::write_metadata(&result.metadata, &result.file_path)?;

    println!(
        "wrote {} ({} bytes, {} fragments, sha256 {})",
        result.file_path.display(),
        result.bytes_written,
        artifact.fragment_count(),
        result.file_checksum
    );
    log::debug!("diagnostics: {:?}", controller.diagnostics());
    log::debug!("delegate saw {} event(s)", events.events().len());
    Ok(result)
}

#[cfg(feature = "native")]
fn run_camera(args: &Args, config: RecorderConfiguration) -> Result<ExportResult, CaptureError> {
    record(camera_record_native::NokhwaCameraHost::new(), args, config)
}

#[cfg(not(feature = "native"))]
fn run_camera(_args: &Args, _config: RecorderConfiguration) -> Result<ExportResult, CaptureError> {
    Err(CaptureError::ConfigurationFailed(
        "built without the `native` feature; camera capture unavailable".into(),
    ))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let result = load_config(args.config.as_deref()).and_then(|config| {
        if args.camera {
            run_camera(&args, config)
        } else {
            record(SyntheticCameraHost::default(), &args, config)
        }
    });

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Recording failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera_record_core::storage::artifact_writer::read_artifact;
    use camera_record_native::SyntheticCameraOptions;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("record_clip_test_{}_{}", std::process::id(), name))
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["record-clip"]).unwrap();
        assert_eq!(args.seconds, 3);
        assert_eq!(args.out, PathBuf::from("recording.mjpeg"));
        assert!(args.config.is_none());
        assert!(args.encrypt_key.is_none());
        assert!(!args.camera);
    }

    #[test]
    fn parses_every_flag() {
        let args = Args::try_parse_from([
            "record-clip",
            "--seconds",
            "0",
            "--out",
            "/tmp/clip.mjpeg",
            "--config",
            "rec.json",
            "--encrypt-key",
            KEY_HEX,
            "--camera",
        ])
        .unwrap();
        assert_eq!(args.seconds, 0);
        assert_eq!(args.out, PathBuf::from("/tmp/clip.mjpeg"));
        assert_eq!(args.config, Some(PathBuf::from("rec.json")));
        let key = args.encrypt_key.unwrap();
        assert_eq!(key[0], 0x00);
        assert_eq!(key[31], 0x1f);
        assert!(args.camera);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["record-clip", "--frames", "10"]).is_err());
        assert!(Args::try_parse_from(["record-clip", "--seconds", "soon"]).is_err());
    }

    #[test]
    fn key_must_be_32_hex_bytes() {
        assert!(parse_key(KEY_HEX).is_ok());
        assert!(parse_key(&KEY_HEX[..62]).is_err());
        assert!(parse_key(&format!("{}00", KEY_HEX)).is_err());
        assert!(parse_key(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn non_ascii_key_is_an_error() {
        let key = "€".repeat(21) + "a";
        assert_eq!(key.len(), 64);
        assert!(parse_key(&key).is_err());
        assert!(Args::try_parse_from(["record-clip", "--encrypt-key", key.as_str()]).is_err());
    }

    #[test]
    fn config_loads_from_file() {
        let path = temp_path("config.json");
        fs::write(&path, r#"{ "timeslice_ms": 100, "constraints": { "frame_rate": 60 } }"#).unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.timeslice_ms, Some(100));
        assert_eq!(config.constraints.frame_rate, Some(60));

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config(Some(path.as_path())), Err(CaptureError::ConfigurationFailed(_))));
        let _ = fs::remove_file(&path);

        let missing = temp_path("missing.json");
        assert!(matches!(load_config(Some(missing.as_path())), Err(CaptureError::ConfigurationFailed(_))));

        assert_eq!(load_config(None).unwrap().timeslice_ms, Some(250));
    }

    #[test]
    fn records_and_exports_synthetic_clip() {
        let out = temp_path("clip.mjpeg");
        let out_arg = out.to_string_lossy().into_owned();
        let args = Args::try_parse_from(["record-clip", "--seconds", "0", "--out", out_arg.as_str()]).unwrap();
        let host = SyntheticCameraHost::new(SyntheticCameraOptions {
            frame_size: 16,
            ..Default::default()
        });

        let result = record(host, &args, load_config(None).unwrap()).unwrap();
        assert_eq!(result.file_path, out);

        let data = read_artifact(&out, None).unwrap();
        assert_eq!(data.len() as u64, result.bytes_written);

        let meta = metadata::read_metadata(&out).unwrap();
        assert_eq!(meta, result.metadata);
        assert_eq!(meta.size_bytes, data.len() as u64);
        assert!(!meta.is_encrypted);

        let _ = fs::remove_file(&out);
        let _ = fs::remove_file(metadata::metadata_path(&out));
    }

    #[test]
    fn encrypted_export_reads_back_with_key() {
        let out = temp_path("clip.mjpeg.enc");
        let out_arg = out.to_string_lossy().into_owned();
        let args = Args::try_parse_from([
            "record-clip",
            "--seconds",
            "0",
            "--out",
            out_arg.as_str(),
            "--encrypt-key",
            KEY_HEX,
        ])
        .unwrap();

        let result = record(SyntheticCameraHost::default(), &args, load_config(None).unwrap()).unwrap();

        let key = parse_key(KEY_HEX).unwrap();
        let encryptor = AesGcmEncryptor::new(key, CLI_KEY_ID);
        let plain = read_artifact(&out, Some(&encryptor as &dyn CaptureEncryptor)).unwrap();
        assert_eq!(plain.len() as u64, result.metadata.size_bytes);

        let meta = metadata::read_metadata(&out).unwrap();
        assert!(meta.is_encrypted);
        assert_eq!(meta.encryption_key_id.as_deref(), Some(CLI_KEY_ID));

        let _ = fs::remove_file(&out);
        let _ = fs::remove_file(metadata::metadata_path(&out));
    }
}
