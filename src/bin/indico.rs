//! indico: call the prediction service from the command line
//!
//! Usage:
//!   indico <api> [<json-input>] [OPTIONS]      Call one operation, print the JSON result
//!   indico list                                List operation names
//!   indico version                             Show version information

use anyhow::{anyhow, bail, Context};
use indicoio::input::infer_batch;
use indicoio::{Api, CallOptions, Client, ImageInput, Input, ItemShape};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "list" => cmd_list(),
        "version" | "--version" | "-V" => cmd_version(),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            init_logging();
            if let Err(e) = cmd_call(&args[1..]) {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!(
        r#"indico - indico prediction service client

USAGE:
    indico <API> [JSON-INPUT] [OPTIONS]
    indico list
    indico version

OPTIONS:
    --cloud <name>          Private cloud for this call
    --api-key <key>         API key for this call
    --version <n>           Pin a model version
    --batch                 Treat the input as a batch (wraps a single item)
    --apis <a,b,..>         Operations to combine (predict_text / predict_image)
    --collection <name>     Collection for add_data, train, predict, ...
    --param <key=json>      Extra body parameter, repeatable

ENVIRONMENT:
    INDICO_API_KEY          API key
    INDICO_CLOUD            Default private cloud
    INDICO_TIMEOUT_SECS     Request timeout
    INDICO_CONFIG           Config file used instead of .indicorc.yaml
    RUST_LOG                Log filter (e.g. indicoio=debug)"#
    );
}

fn cmd_version() {
    println!("indico {}", env!("CARGO_PKG_VERSION"));
}

fn cmd_list() {
    for api in Api::ALL {
        let spec = api.spec();
        let scope = if spec.private_only { "private" } else { "public" };
        println!("{:<20} {}", api.name(), scope);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Default)]
struct CallArgs {
    input: Option<String>,
    batch: bool,
    apis: Vec<Api>,
    collection: Option<String>,
    options: CallOptions,
}

fn parse_args(args: &[String]) -> anyhow::Result<CallArgs> {
    let mut parsed = CallArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| anyhow!("{flag} needs a value"))
        };
        match arg.as_str() {
            "--cloud" => parsed.options = parsed.options.cloud(value("--cloud")?),
            "--api-key" => parsed.options = parsed.options.api_key(value("--api-key")?),
            "--version" => parsed.options = parsed.options.version(value("--version")?),
            "--batch" => parsed.batch = true,
            "--collection" => parsed.collection = Some(value("--collection")?),
            "--apis" => {
                parsed.apis = value("--apis")?
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|name| Api::from_name(name).ok_or_else(|| anyhow!("unknown api '{name}'")))
                    .collect::<anyhow::Result<_>>()?;
            }
            "--param" => {
                let pair = value("--param")?;
                let (key, raw) = pair
                    .split_once('=')
                    .ok_or_else(|| anyhow!("--param expects key=value, got '{pair}'"))?;
                let v = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
                parsed.options = parsed.options.param(key, v);
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            positional => {
                if parsed.input.is_some() {
                    bail!("unexpected argument '{positional}'");
                }
                parsed.input = Some(positional.to_string());
            }
        }
    }
    Ok(parsed)
}

/// Parse the input as JSON, falling back to a bare string so `indico sentiment hello` works.
///
/// With `--batch`, anything the endpoint would read as one item (a string, a pixel
/// array, an `[item, target]` pair) is wrapped into a one-element batch.
fn parse_input(raw: Option<&str>, batch: bool, shape: ItemShape) -> Value {
    let value = match raw {
        None => return Value::Null,
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
    };
    if batch && !matches!(infer_batch(&value, shape), Ok(true)) {
        Value::Array(vec![value])
    } else {
        value
    }
}

fn cmd_call(args: &[String]) -> anyhow::Result<()> {
    let name = &args[0];
    let api = Api::from_name(name).ok_or_else(|| anyhow!("unknown api '{name}' (see `indico list`)"))?;
    let parsed = parse_args(&args[1..])?;
    let mut options = parsed.options;
    if let Some(collection) = &parsed.collection {
        options = options.param("collection", collection.as_str());
    }
    let input = parse_input(parsed.input.as_deref(), parsed.batch, api.spec().item);

    let client = Client::new().context("failed to configure client")?;
    let result = match api {
        Api::MultiText | Api::MultiImage => {
            if parsed.apis.is_empty() {
                bail!("{name} needs --apis");
            }
            let multi = if api == Api::MultiText {
                client.predict_text(text_input(input)?, &parsed.apis, &options)?
            } else {
                client.predict_image(image_input(input)?, &parsed.apis, &options)?
            };
            serde_json::to_value(multi)?
        }
        Api::TrainCollection => {
            let collection = parsed
                .collection
                .as_deref()
                .ok_or_else(|| anyhow!("train needs --collection"))?;
            client.collection(collection).train(&options)?
        }
        _ => serde_json::to_value(client.predict_value(api, &input, &options)?)?,
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn text_input(value: Value) -> anyhow::Result<Input<String>> {
    match value {
        Value::String(s) => Ok(Input::Single(s)),
        Value::Array(items) => items
            .into_iter()
            .map(|v| match v {
                Value::String(s) => Ok(s),
                other => bail!("text batch entries must be strings, got {other}"),
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map(Input::Batch),
        other => bail!("text input must be a string or a list of strings, got {other}"),
    }
}

fn image_input(value: Value) -> anyhow::Result<Input<ImageInput>> {
    match value {
        Value::String(s) => Ok(Input::Single(ImageInput::from_string(s))),
        Value::Array(items) => items
            .into_iter()
            .map(|v| match v {
                Value::String(s) => Ok(ImageInput::from_string(s)),
                other => bail!("image batch entries must be strings, got {other}"),
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map(Input::Batch),
        other => bail!("image input must be a string or a list of strings, got {other}"),
    }
}
