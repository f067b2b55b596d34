use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use unicorn_draw::rendering::raster::{rasterize, rasterize_led};
use unicorn_draw::{codec, server, Drawing, ServerConfig};

#[derive(Parser)]
#[command(name = "unicorn-draw", version, about = "32x32 pixel-art gallery server and codec tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the gallery server
    Serve {
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
        #[arg(long, env = "DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
        /// Directory of static pages (editor, viewer, gallery)
        #[arg(long, env = "PUBLIC_ROOT")]
        public_root: Option<PathBuf>,
        /// Secret required by /api/next
        #[arg(long, env = "API_SECRET", hide_env_values = true)]
        secret: Option<String>,
        /// Keep the gallery in memory only
        #[arg(long)]
        ephemeral: bool,
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Print the share token for a drawing JSON file
    Encode { drawing: PathBuf },
    /// Print the drawing JSON carried by a share token or link
    Decode { token: String },
    /// Render a token or drawing JSON file to a binary PPM image
    Render {
        input: String,
        output: PathBuf,
        /// 32x32 LED frame instead of the on-screen grid
        #[arg(long)]
        led: bool,
    },
}

fn load_drawing(input: &str) -> Result<Drawing> {
    let path = PathBuf::from(input);
    if path.is_file() {
        let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        return Ok(Drawing::from_json_str(&text));
    }
    let token = codec::payload_from_fragment(input).unwrap_or(input);
    Ok(codec::decode(token))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            bind,
            data_dir,
            public_root,
            secret,
            ephemeral,
            workers,
        } => {
            let mut config = ServerConfig {
                bind,
                port,
                data_dir,
                public_root,
                secret: secret.filter(|s| !s.is_empty()),
                ephemeral,
                ..Default::default()
            };
            if let Some(workers) = workers {
                config.workers = workers;
            }
            server::run(config).context("gallery server failed")?;
        }
        Command::Encode { drawing } => {
            let text = fs::read_to_string(&drawing).with_context(|| format!("reading {}", drawing.display()))?;
            println!("{}", codec::encode(&Drawing::from_json_str(&text)));
        }
        Command::Decode { token } => {
            let token = codec::payload_from_fragment(&token).unwrap_or(&token);
            let drawing = codec::decode_strict(token).context("invalid share token")?;
            println!("{}", drawing.to_json_pretty());
        }
        Command::Render { input, output, led } => {
            let drawing = load_drawing(&input)?;
            let frame = if led {
                rasterize_led(&drawing)
            } else {
                rasterize(&drawing)
            };
            fs::write(&output, frame.to_ppm()).with_context(|| format!("writing {}", output.display()))?;
            log::info!("wrote {}x{} frame to {}", frame.width, frame.height, output.display());
        }
    }
    Ok(())
}
