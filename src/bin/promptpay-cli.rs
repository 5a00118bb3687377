use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use promptpay::{
    payload::{parse_fields, verify, AccountIdentifier, PayloadBuilder},
    PaymentRequest, PngDataUrlRenderer, QrRenderer, RenderOptions, SchemeConfig, CurrencyPolicy,
};
use serde_json::json;
use tracing::{debug, error};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, help = "Output only JSON without any formatting or messages")]
    json: bool,

    #[arg(long, help = "Reject currencies the scheme cannot encode instead of omitting them")]
    strict_currency: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RequestArgs {
    /// Mobile number, national ID, or e-wallet/reference number
    account: String,

    #[arg(short, long, default_value = "", help = "Amount, omit for a reusable amount-less code")]
    amount: String,

    #[arg(short, long, help = "Currency code, defaults to the scheme currency (THB)")]
    currency: Option<String>,

    #[arg(long, help = "Country code, defaults to the scheme country (TH)")]
    country: Option<String>,

    #[arg(long, help = "Mark the code as reusable (static) instead of one-time")]
    reusable: bool,
}

impl From<RequestArgs> for PaymentRequest {
    fn from(args: RequestArgs) -> Self {
        PaymentRequest {
            account: args.account,
            one_time: !args.reusable,
            country: args.country,
            amount: args.amount,
            currency: args.currency,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the payload string for an account
    Payload(RequestArgs),

    /// Render the payload as a PNG QR code
    Qr {
        #[command(flatten)]
        request: RequestArgs,

        #[arg(short, long, help = "Write PNG here instead of printing a data URL")]
        output: Option<String>,

        #[arg(long, default_value_t = RenderOptions::default().module_size)]
        module_size: u32,

        #[arg(long, default_value_t = RenderOptions::default().margin)]
        margin: u32,
    },

    /// Check the trailing CRC of an existing payload
    Verify {
        payload: String,
    },

    /// Show how an account string is classified
    Classify {
        account: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // Initialize logging only if not in JSON mode
    if !cli.json {
        tracing_subscriber::fmt::init();
    }

    let mut scheme = SchemeConfig::default();
    if cli.strict_currency {
        scheme.currency_policy = CurrencyPolicy::Strict;
    }

    match cli.command {
        Commands::Payload(args) => {
            let req = PaymentRequest::from(args);
            let payload = PayloadBuilder::new(&scheme).build(&req)?;
            if cli.json {
                println!("{}", json!({ "payload": payload }));
            } else {
                println!("{}", payload);
            }
        }

        Commands::Qr { request, output, module_size, margin } => {
            let req = PaymentRequest::from(request);
            let payload = PayloadBuilder::new(&scheme).build(&req)?;
            let renderer = PngDataUrlRenderer::new(RenderOptions { module_size, margin });

            match output {
                Some(path) => {
                    let png = renderer.render_png(payload.as_str())?;
                    std::fs::write(&path, png).with_context(|| format!("Failed to write {}", path))?;
                    debug!("Wrote {}", path);
                    if cli.json {
                        println!("{}", json!({ "payload": payload, "output": path }));
                    } else {
                        println!("Payload: {}\nQR code written to {}", payload, path);
                    }
                }
                None => {
                    let data_url = renderer.render(payload.as_str())?;
                    if cli.json {
                        println!("{}", json!({ "payload": payload, "qrCode": data_url }));
                    } else {
                        println!("{}", data_url);
                    }
                }
            }
        }

        Commands::Verify { payload } => {
            let result = verify(&payload);
            if cli.json {
                let fields: Vec<_> = parse_fields(&payload)
                    .map(|fields| {
                        fields
                            .iter()
                            .map(|f| json!({ "tag": f.tag(), "length": f.length(), "value": f.value() }))
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                println!(
                    "{}",
                    json!({
                        "valid": result.is_ok(),
                        "error": result.as_ref().err().map(|e| e.to_string()),
                        "fields": fields,
                    })
                );
            } else {
                match &result {
                    Ok(()) => println!("Checksum OK"),
                    Err(e) => error!("Invalid payload: {}", e),
                }
            }
            result?;
        }

        Commands::Classify { account } => {
            let identifier = AccountIdentifier::classify(&account);
            let field = identifier.merchant_field(&scheme)?;
            if cli.json {
                println!(
                    "{}",
                    json!({ "account": identifier, "tag": field.tag(), "field": field.encode() })
                );
            } else {
                println!("{} (tag {}): {}", identifier.kind(), field.tag(), field.encode());
            }
        }
    }

    Ok(())
}
