//! inworld-tts: command-line front end for the Inworld TTS client
//!
//! Usage:
//!   inworld-tts speak "<text>" [--voice <voice>] [--out <file>] [--format <fmt>]
//!                              [--rate <hz>] [--bitrate <kbps>] [--depth <bits>] [--stream]
//!   inworld-tts script <file.yaml> [--out <file>] [--pause-ms <ms>] [--compat-pause]
//!   inworld-tts voices
//!
//! The buffered `speak` and `script` paths hold the whole result in memory and
//! write nothing on failure. `speak --stream` writes chunks as they arrive, so a
//! failure mid-stream leaves the bytes received so far in the output file.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use futures::StreamExt;
use inworld_tts::{
    AudioFormat, Language, Model, PauseMode, ScriptDocument, SpeakOptions, TtsClient, Voice,
    DEFAULT_PAUSE_MS,
};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Inworld text-to-speech from the command line
#[derive(Parser, Debug)]
#[command(name = "inworld-tts")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize a single piece of text
    Speak(SpeakArgs),

    /// Render a multi-speaker script file (YAML or JSON)
    Script {
        /// Script document with `speakers` and `script` entries
        file: PathBuf,

        /// Output file path [default: output.<ext> for the first speaker's format]
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,

        /// Pause after each line, in milliseconds (overrides the document)
        #[arg(long = "pause-ms")]
        pause_ms: Option<u64>,

        /// Insert empty pauses, as earlier releases did
        #[arg(long = "compat-pause")]
        compat_pause: bool,
    },

    /// List supported voices, languages, models and formats
    Voices,
}

#[derive(Args, Debug)]
struct SpeakArgs {
    /// Text to synthesize
    text: String,

    #[arg(short = 'v', long = "voice")]
    voice: Option<String>,

    /// Output file path
    #[arg(short = 'o', long = "out", default_value = "output.mp3")]
    out: PathBuf,

    /// mp3, wav, opus, mulaw or alaw
    #[arg(long = "format")]
    format: Option<String>,

    /// Sample rate in Hz
    #[arg(long = "rate")]
    rate: Option<u32>,

    /// Bit rate in kbps
    #[arg(long = "bitrate")]
    bitrate: Option<u32>,

    /// Bit depth for WAV output
    #[arg(long = "depth")]
    depth: Option<u32>,

    #[arg(long = "language")]
    language: Option<String>,

    #[arg(long = "model")]
    model: Option<String>,

    #[arg(long = "temperature")]
    temperature: Option<f32>,

    #[arg(long = "speed")]
    speed: Option<f32>,

    #[arg(long = "pitch", allow_hyphen_values = true)]
    pitch: Option<f32>,

    /// Write audio chunks as they arrive
    #[arg(short = 's', long = "stream")]
    stream: bool,
}

impl SpeakArgs {
    fn options(&self) -> SpeakOptions {
        SpeakOptions {
            voice_id: self.voice.clone(),
            language: self.language.clone(),
            model_id: self.model.clone(),
            temperature: self.temperature,
            speed: self.speed,
            pitch: self.pitch,
            format: self.format.clone(),
            sample_rate_hertz: self.rate,
            bit_rate: self.bitrate,
            bit_depth: self.depth,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Voices => {
            print_catalog();
            Ok(())
        }
        Command::Speak(args) => {
            let client = client_from_env()?;
            cmd_speak(&client, &args).await
        }
        Command::Script {
            file,
            out,
            pause_ms,
            compat_pause,
        } => {
            let client = client_from_env()?;
            let doc = ScriptDocument::from_path(&file)
                .with_context(|| format!("cannot load script {}", file.display()))?;
            let pause_ms = pause_ms.or(doc.pause_ms).unwrap_or(DEFAULT_PAUSE_MS);
            let mode = if compat_pause {
                PauseMode::Empty
            } else {
                PauseMode::Silence
            };

            println!("Generating script audio ({} lines)...", doc.script.len());
            let audio = client
                .synthesize_script_with(&doc.speakers, &doc.script, pause_ms, mode)
                .await?;
            let out = out.unwrap_or_else(|| default_script_output(&doc));
            let path = absolute(&out)?;
            tokio::fs::write(&path, &audio)
                .await
                .with_context(|| format!("cannot write {}", path.display()))?;
            println!(" Audio saved to {}", path.display());
            Ok(())
        }
    }
}

fn client_from_env() -> anyhow::Result<TtsClient> {
    if std::env::var("INWORLD_API_KEY").map_or(true, |k| k.is_empty()) {
        anyhow::bail!("INWORLD_API_KEY environment variable is required.");
    }
    Ok(TtsClient::builder().from_env().build()?)
}

async fn cmd_speak(client: &TtsClient, args: &SpeakArgs) -> anyhow::Result<()> {
    let options = args.options();
    let path = absolute(&args.out)?;

    if args.stream {
        println!("Streaming speech...");
        let mut chunks = client.synthesize_stream(&args.text, &options).await?;
        let mut file = tokio::fs::File::create(&path)
            .await
            .with_context(|| format!("cannot create {}", path.display()))?;
        let mut written = 0usize;
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            // Land each chunk on disk before the next one is awaited.
            file.flush().await?;
            written += chunk.len();
        }
        info!(bytes = written, "stream complete");
        println!(" Streamed audio saved to {}", path.display());
    } else {
        println!("Generating speech...");
        let audio = client.synthesize(&args.text, &options).await?;
        tokio::fs::write(&path, &audio)
            .await
            .with_context(|| format!("cannot write {}", path.display()))?;
        println!(" Audio saved to {}", path.display());
    }
    Ok(())
}

fn default_script_output(doc: &ScriptDocument) -> PathBuf {
    let format = doc
        .speakers
        .first()
        .and_then(|s| s.options.format.as_deref())
        .and_then(|f| f.parse::<AudioFormat>().ok())
        .unwrap_or_default();
    PathBuf::from(format!("output.{}", format.extension()))
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn print_catalog() {
    let join = |items: Vec<&str>| items.join(", ");
    println!("Voices:    {}", join(Voice::ALL.iter().map(|v| v.as_str()).collect()));
    println!("Languages: {}", join(Language::ALL.iter().map(|l| l.as_str()).collect()));
    println!(
        "Models:    {} (default {})",
        join(Model::ALL.iter().map(|m| m.as_str()).collect()),
        Model::default()
    );
    println!(
        "Formats:   {} (default {})",
        join(AudioFormat::ALL.iter().map(|f| f.as_str()).collect()),
        AudioFormat::default()
    );
}
