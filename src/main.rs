use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};

use rusbit_announce::bencode::{bvalue_to_json, encode_bvalue, json_to_bvalue, Decoder};
use rusbit_announce::tracker::{AnnounceRequest, TrackerClient};
use rusbit_announce::utils::generate_peer_id;
use rusbit_announce::{Config, Torrent};

#[derive(Parser, Debug)]
#[command(name = "rusbit-announce")]
#[command(about = "Bencode codec and BitTorrent tracker announce client", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./rusbit.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a bencoded string and print it as JSON
    Decode { bencoded: String },

    /// Encode a JSON value as bencode
    Encode { json: String },

    /// Print the announce parameters and layout of a .torrent file
    Info { torrent: PathBuf },

    /// Announce to the tracker and list the peers it returns
    Peers {
        torrent: PathBuf,

        /// Port reported to the tracker
        #[arg(long)]
        port: Option<u16>,

        /// Number of peers to ask for
        #[arg(long)]
        numwant: Option<u32>,

        /// Print the full tracker response as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("loading config")?;

    match cli.command {
        Commands::Decode { bencoded } => {
            let value = Decoder::new(bencoded.as_bytes())
                .with_max_depth(config.max_depth)
                .decode()
                .context("decoding input")?;
            println!("{}", serde_json::to_string(&bvalue_to_json(&value))?);
        }
        Commands::Encode { json } => {
            let parsed: serde_json::Value = serde_json::from_str(&json).context("parsing JSON")?;
            let value = json_to_bvalue(&parsed)?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&encode_bvalue(&value))?;
            stdout.write_all(b"\n")?;
        }
        Commands::Info { torrent } => {
            let torrent = Torrent::from_file(&torrent, config.max_depth)
                .with_context(|| format!("reading {}", torrent.display()))?;
            print_info(&torrent);
        }
        Commands::Peers {
            torrent,
            port,
            numwant,
            json,
        } => {
            let torrent = Torrent::from_file(&torrent, config.max_depth)
                .with_context(|| format!("reading {}", torrent.display()))?;
            peers(&config, &torrent, port, numwant, json)?;
        }
    }
    Ok(())
}

fn print_info(torrent: &Torrent) {
    println!("Tracker URL: {}", torrent.params.announce_url);
    println!("Info Hash: {}", torrent.params.info_hash);
    println!("Length: {}", torrent.params.bytes_left);
    if let Some(ref name) = torrent.name {
        println!("Name: {}", name);
    }
    if let Some(piece_length) = torrent.piece_length {
        println!("Piece Length: {}", piece_length);
    }
    println!("Number of Pieces: {}", torrent.pieces.len());
    for file in &torrent.files {
        println!("  {} ({} bytes)", file.path.join("/"), file.length);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn peers(
    config: &Config,
    torrent: &Torrent,
    port: Option<u16>,
    numwant: Option<u32>,
    json: bool,
) -> Result<()> {
    let peer_id = generate_peer_id(&config.peer_id_prefix);
    let request = AnnounceRequest::new(&torrent.params, peer_id, port.unwrap_or(config.listen_port))
        .with_numwant(numwant.unwrap_or(config.numwant));

    let client = TrackerClient::new(config.request_timeout(), &config.user_agent)?
        .with_max_depth(config.max_depth);
    let response = client
        .announce(&torrent.params.announce_url, &request)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    info!("Found {} peers from tracker", response.peers.len());
    for peer in &response.peers {
        println!("{}", peer);
    }
    Ok(())
}
