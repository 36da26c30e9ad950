use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mobilepay::webhook::WebhookVerifier;
use mobilepay::{AppSwitch, AppSwitchConfig, BackendConfig, RequestSigner, SigningKeyPair};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "mobilepay", version, about = "MobilePay request signing and webhook tools")]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the AuthenticationSignature header for an AppSwitch request.
    Sign {
        #[clap(flatten)]
        keys: KeyArgs,
        /// Absolute request URL including the query string.
        #[clap(long)]
        url: String,
        /// File holding the exact request body. Omit for requests without one.
        #[clap(long)]
        body: Option<PathBuf>,
    },
    /// Check a webhook body against its x-mobilepay-signature value.
    VerifyWebhook {
        /// URL the webhook was registered with.
        #[clap(long)]
        url: String,
        #[clap(long)]
        signature: String,
        #[clap(long, env = "MOBILEPAY_WEBHOOK_SECRET", hide_env_values = true)]
        secret: String,
        /// Body file. Reads stdin when omitted.
        #[clap(long)]
        body: Option<PathBuf>,
    },
    /// Fetch the AppSwitch status of an order and print it as JSON.
    PaymentStatus {
        #[clap(flatten)]
        keys: KeyArgs,
        #[clap(long, env = "MOBILEPAY_MERCHANT_ID")]
        merchant_id: String,
        #[clap(long, env = "MOBILEPAY_SUBSCRIPTION_KEY", hide_env_values = true)]
        subscription_key: String,
        #[clap(long, env = "MOBILEPAY_API_URL")]
        api_url: Option<String>,
        #[clap(long, env = "MOBILEPAY_TEST_MODE")]
        test_mode: bool,
        #[clap(long)]
        order_id: String,
    },
}

#[derive(Args)]
struct KeyArgs {
    #[clap(long, env = "MOBILEPAY_PRIVATE_KEY")]
    private_key: PathBuf,
    #[clap(long, env = "MOBILEPAY_PUBLIC_KEY")]
    public_key: PathBuf,
    /// Password of an encrypted (PKCS#1 or PKCS#8) private key.
    #[clap(long, env = "MOBILEPAY_PRIVATE_KEY_PASSWORD", hide_env_values = true)]
    private_key_password: Option<String>,
}

impl KeyArgs {
    fn load(&self) -> Result<SigningKeyPair> {
        SigningKeyPair::from_pem_files(
            &self.private_key,
            &self.public_key,
            self.private_key_password.as_deref(),
        )
        .with_context(|| format!("loading key pair from {}", self.private_key.display()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Sign { keys, url, body } => {
            let body = match body {
                Some(path) => read_file(&path)?,
                None => Vec::new(),
            };
            let signer = RequestSigner::new(&keys.load()?);
            let signature = signer.sign(&url, &body).context("signing request")?;
            println!("{signature}");
        }
        Command::VerifyWebhook {
            url,
            signature,
            secret,
            body,
        } => {
            let mut verifier = WebhookVerifier::with_signature(&signature, &url, &secret)?;
            match body {
                Some(path) => verifier.update(&read_file(&path)?),
                None => {
                    io::copy(&mut io::stdin().lock(), &mut verifier).context("reading stdin")?;
                }
            }
            verifier.ensure().context("webhook signature rejected")?;
            tracing::info!(%url, "webhook signature verified");
            println!("ok");
        }
        Command::PaymentStatus {
            keys,
            merchant_id,
            subscription_key,
            api_url,
            test_mode,
            order_id,
        } => {
            let config = AppSwitchConfig::builder(merchant_id, subscription_key)
                .key_pair(keys.load()?)
                .build();
            let mut backend = BackendConfig::default().with_test_mode(test_mode);
            if let Some(url) = api_url {
                backend = backend.with_url(url);
            }

            let client = AppSwitch::new(&config, backend)?;
            let status = client
                .payment_status(&order_id)
                .await
                .with_context(|| format!("fetching status of order {order_id}"))?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}
