//! # Uplink CLI
//!
//! Gatewayに対するクォート作成・状態照会・署名付きリンク取得と、
//! secp256k1鍵の生成・署名を行うコマンドラインツール。

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rand::RngCore;
use uplink_crypto::{link_message_digest, sign_digest, Address, Secp256k1SigningKey};
use uplink_types::{CreateQuoteRequest, FileEntry, LinkPayload, Quote, StatusResponse, QUOTE_TYPE_IPFS};

#[derive(Parser, Debug)]
#[command(name = "uplink", about = "Uplink gateway client")]
struct Cli {
    /// GatewayのベースURL
    #[arg(long, env = "UPLINK_GATEWAY", default_value = "http://localhost:3000")]
    gateway: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 新しい秘密鍵を生成し、アドレスとともに表示する
    Keygen,
    /// 秘密鍵に対応するアドレスを表示する
    Address {
        #[arg(long, env = "UPLINK_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },
    /// クォートを作成する
    Quote {
        /// クォートを作成するアドレス（省略時は秘密鍵から導出）
        #[arg(long)]
        address: Option<String>,
        #[arg(long, env = "UPLINK_PRIVATE_KEY", hide_env_values = true)]
        private_key: Option<String>,
        /// ファイルのバイト長（ファイルごとに指定）
        #[arg(long = "length", required = true)]
        lengths: Vec<u64>,
    },
    /// クォートの状態を表示する
    Status {
        #[arg(long)]
        quote_id: String,
    },
    /// リンク取得用の署名を作成する
    Sign {
        #[arg(long)]
        quote_id: String,
        #[arg(long)]
        nonce: String,
        #[arg(long, env = "UPLINK_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },
    /// 署名付きでリンクを取得する
    Link {
        #[arg(long)]
        quote_id: String,
        /// 省略時は現在時刻（ミリ秒）
        #[arg(long)]
        nonce: Option<String>,
        #[arg(long, env = "UPLINK_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let gateway = cli.gateway.trim_end_matches('/').to_string();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Keygen => {
            let key = generate_key();
            println!("private_key: {}", hex::encode(key.to_bytes()));
            println!("address:     {}", address_of(&key));
        }
        Commands::Address { private_key } => {
            println!("{}", address_of(&parse_private_key(&private_key)?));
        }
        Commands::Quote {
            address,
            private_key,
            lengths,
        } => {
            let user_address = resolve_address(address.as_deref(), private_key.as_deref())?;
            let request = quote_request(user_address, &lengths);
            let response = client
                .post(format!("{gateway}/getQuote"))
                .json(&request)
                .send()
                .await
                .context("Gatewayへの接続に失敗しました")?;
            let quote: Quote = read_json(response).await?;
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        Commands::Status { quote_id } => {
            let response = client
                .get(format!("{gateway}/getStatus"))
                .query(&[("quoteId", quote_id.as_str())])
                .send()
                .await
                .context("Gatewayへの接続に失敗しました")?;
            let status: StatusResponse = read_json(response).await?;
            println!("{}", status.status);
        }
        Commands::Sign {
            quote_id,
            nonce,
            private_key,
        } => {
            let key = parse_private_key(&private_key)?;
            println!("{}", sign_link(&key, &quote_id, &nonce)?);
        }
        Commands::Link {
            quote_id,
            nonce,
            private_key,
        } => {
            let key = parse_private_key(&private_key)?;
            let nonce = nonce.unwrap_or_else(default_nonce);
            let signature = sign_link(&key, &quote_id, &nonce)?;
            let response = client
                .get(format!("{gateway}/getLink"))
                .query(&[
                    ("quoteId", quote_id.as_str()),
                    ("nonce", nonce.as_str()),
                    ("signature", signature.as_str()),
                ])
                .send()
                .await
                .context("Gatewayへの接続に失敗しました")?;
            let link: LinkPayload = read_json(response).await?;
            for url in link.links {
                println!("{url}");
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// ヘルパー
// ---------------------------------------------------------------------------

/// 16進数（`0x` 省略可）の秘密鍵をパースする。
fn parse_private_key(s: &str) -> Result<Secp256k1SigningKey> {
    let s = s.trim();
    let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))
        .map_err(|e| anyhow!("秘密鍵の16進数デコードに失敗: {e}"))?;
    Secp256k1SigningKey::from_slice(&bytes).map_err(|_| anyhow!("秘密鍵が不正です"))
}

/// 乱数から有効な秘密鍵が得られるまで生成を繰り返す。
fn generate_key() -> Secp256k1SigningKey {
    let mut bytes = [0u8; 32];
    loop {
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        if let Ok(key) = Secp256k1SigningKey::from_slice(&bytes) {
            return key;
        }
    }
}

fn address_of(key: &Secp256k1SigningKey) -> Address {
    Address::from_verifying_key(key.verifying_key())
}

/// 明示されたアドレス、なければ秘密鍵から導出したアドレス。
fn resolve_address(address: Option<&str>, private_key: Option<&str>) -> Result<Address> {
    match (address, private_key) {
        (Some(address), _) => {
            Address::parse(address).map_err(|e| anyhow!("アドレスが不正です: {e}"))
        }
        (None, Some(key)) => Ok(address_of(&parse_private_key(key)?)),
        (None, None) => Err(anyhow!("--address または --private-key を指定してください")),
    }
}

fn quote_request(user_address: Address, lengths: &[u64]) -> CreateQuoteRequest {
    CreateQuoteRequest {
        quote_type: QUOTE_TYPE_IPFS.to_string(),
        user_address: user_address.to_checksum(),
        files: lengths.iter().map(|&length| FileEntry { length }).collect(),
    }
}

fn sign_link(key: &Secp256k1SigningKey, quote_id: &str, nonce: &str) -> Result<String> {
    sign_digest(key, &link_message_digest(quote_id, nonce))
        .map_err(|e| anyhow!("署名に失敗しました: {e}"))
}

fn default_nonce() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
        .to_string()
}

/// 成功レスポンスをJSONとして読み、失敗時はステータスと本文をエラーにする。
async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("Gatewayがエラーを返しました ({status}): {body}"));
    }
    response
        .json()
        .await
        .context("レスポンスのパースに失敗しました")
}
