use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};

use crate::{
    cli::{LogFormat, Opts},
    config::{self, Format, PodParserConfig},
    manifest,
    models::Pods,
    trace,
};

const STDIN: &str = "-";

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("{source}"))]
    Config { source: config::LoadError },

    #[snafu(display("could not read {}: {}", path.display(), source))]
    ReadInput { source: io::Error, path: PathBuf },

    #[snafu(display("could not decode {}: {}", path.display(), source))]
    Decode {
        source: manifest::DecodeError,
        path: PathBuf,
    },

    #[snafu(display("could not write output: {source}"))]
    WriteOutput { source: io::Error },
}

impl Error {
    pub const fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Error::Config { .. } => exitcode::CONFIG,
            Error::ReadInput { .. } => exitcode::NOINPUT,
            Error::Decode { .. } => exitcode::DATAERR,
            Error::WriteOutput { .. } => exitcode::IOERR,
        }
    }
}

/// Entry point of the binary: sets up logging, converts the manifests and
/// writes the result to stdout.
pub fn run(opts: &Opts) -> exitcode::ExitCode {
    let levels = std::env::var("LOG").unwrap_or_else(|_| {
        match opts.log_level() {
            "off" => "off".to_owned(),
            level => format!("mesh_pods={level}"),
        }
    });
    trace::init(
        opts.color.use_color(),
        opts.log_format == LogFormat::Json,
        &levels,
    );

    let stdout = io::stdout();
    match convert(opts, &mut stdout.lock()) {
        Ok(count) => {
            debug!(message = "Converted pods.", count);
            exitcode::OK
        }
        Err(error) => {
            error!(message = "Conversion failed.", %error);
            error.exit_code()
        }
    }
}

/// Converts every manifest named in `opts` and writes one JSON array of pods.
pub fn convert(opts: &Opts, out: &mut impl Write) -> Result<usize, Error> {
    let mut config = match &opts.config {
        Some(path) => PodParserConfig::load(path).context(ConfigSnafu)?,
        None => PodParserConfig::default(),
    };
    if let Some(timezone) = opts.timezone {
        config.timezone = timezone;
    }

    let stdin = [PathBuf::from(STDIN)];
    let paths = if opts.paths.is_empty() {
        &stdin[..]
    } else {
        &opts.paths[..]
    };

    let mut k8s_pods = Vec::new();
    for path in paths {
        let text = read_input(path).context(ReadInputSnafu { path })?;
        let format = opts.input_format.unwrap_or_else(|| guess_format(path));
        let decoded = manifest::decode(&text, format).context(DecodeSnafu { path })?;
        debug!(message = "Decoded manifest.", path = ?path, %format, pods = decoded.len());
        k8s_pods.extend(decoded);
    }

    let pods = Pods::parse(&k8s_pods, &config);
    if opts.pretty {
        serde_json::to_writer_pretty(&mut *out, &pods)
    } else {
        serde_json::to_writer(&mut *out, &pods)
    }
    .map_err(io::Error::from)
    .context(WriteOutputSnafu)?;
    writeln!(out).context(WriteOutputSnafu)?;

    Ok(pods.len())
}

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == STDIN {
        let mut text = String::new();
        io::stdin().lock().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
    }
}

/// YAML is a superset of JSON, so it is the fallback for unknown extensions.
fn guess_format(path: &Path) -> Format {
    Format::from_path(path).unwrap_or(Format::Yaml)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use indoc::indoc;

    use super::*;

    const PODS_YAML: &str = indoc! {r#"
        apiVersion: v1
        kind: PodList
        items:
        - metadata:
            name: details-v1-3618568057-dnkjp
            creationTimestamp: "2018-03-08T14:44:00Z"
            labels:
              apps: details
              version: v1
            annotations:
              kubernetes.io/created-by: '{"kind":"SerializedReference","reference":{"kind":"ReplicaSet","name":"details-v1-3618568057"}}'
              sidecar.istio.io/status: '{"initContainers":["istio-init"],"containers":["istio-proxy"]}'
          spec:
            containers:
            - name: details
              image: whatever
            - name: istio-proxy
              image: docker.io/istio/proxy:0.7.1
            initContainers:
            - name: istio-init
              image: docker.io/istio/proxy_init:0.7.1
        - metadata:
            name: ratings-v1-1234
            creationTimestamp: "2018-03-08T14:45:00Z"
          spec:
            containers:
            - name: ratings
              image: ratings:v1
    "#};

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn opts(args: &[&str]) -> Opts {
        let mut argv = vec!["mesh-pods"];
        argv.extend_from_slice(args);
        Opts::try_parse_from(argv).unwrap()
    }

    fn convert_to_json(opts: &Opts) -> Result<serde_json::Value, Error> {
        let mut out = Vec::new();
        convert(opts, &mut out)?;
        Ok(serde_json::from_slice(&out).unwrap())
    }

    #[test]
    fn converts_pod_list() {
        let dir = tempfile::tempdir().unwrap();
        let pods = write_file(dir.path(), "pods.yaml", PODS_YAML);

        let output = convert_to_json(&opts(&[
            "--timezone",
            "Europe/Moscow",
            pods.to_str().unwrap(),
        ]))
        .unwrap();

        assert_eq!(
            output,
            serde_json::json!([
                {
                    "name": "details-v1-3618568057-dnkjp",
                    "labels": { "apps": "details", "version": "v1" },
                    "createdAt": "2018-03-08T17:44:00+03:00",
                    "createdBy": { "name": "details-v1-3618568057", "kind": "ReplicaSet" },
                    "istioContainers": [
                        { "name": "istio-proxy", "image": "docker.io/istio/proxy:0.7.1" }
                    ],
                    "istioInitContainers": [
                        { "name": "istio-init", "image": "docker.io/istio/proxy_init:0.7.1" }
                    ]
                },
                {
                    "name": "ratings-v1-1234",
                    "labels": {},
                    "createdAt": "2018-03-08T17:45:00+03:00",
                    "createdBy": { "name": "", "kind": "" },
                    "istioContainers": [],
                    "istioInitContainers": []
                }
            ])
        );
    }

    #[test]
    fn config_file_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let pods = write_file(dir.path(), "pods.yaml", PODS_YAML);
        let config = write_file(
            dir.path(),
            "parser.toml",
            indoc! {r#"
                sidecar_status_annotation = "example.com/sidecars"
                timezone = "Europe/Moscow"
            "#},
        );

        let output = convert_to_json(&opts(&[
            "--config",
            config.to_str().unwrap(),
            "--timezone",
            "UTC",
            pods.to_str().unwrap(),
        ]))
        .unwrap();

        assert_eq!(output[0]["createdAt"], "2018-03-08T14:44:00Z");
        assert_eq!(output[0]["istioContainers"], serde_json::json!([]));
        assert_eq!(output[0]["createdBy"]["kind"], "ReplicaSet");
    }

    #[test]
    fn input_format_overrides_extension() {
        let dir = tempfile::tempdir().unwrap();
        let pod = write_file(
            dir.path(),
            "pod.txt",
            r#"{"apiVersion": "v1", "kind": "Pod", "metadata": {"name": "solo"}}"#,
        );

        let output = convert_to_json(&opts(&[
            "--input-format",
            "json",
            pod.to_str().unwrap(),
        ]))
        .unwrap();
        assert_eq!(output[0]["name"], "solo");
    }

    #[test]
    fn errors_map_to_exit_codes() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.yaml");
        let error = convert_to_json(&opts(&[missing.to_str().unwrap()])).unwrap_err();
        assert!(matches!(error, Error::ReadInput { .. }));
        assert_eq!(error.exit_code(), exitcode::NOINPUT);

        let service = write_file(
            dir.path(),
            "service.yaml",
            "apiVersion: v1\nkind: Service\nmetadata:\n  name: details\n",
        );
        let error = convert_to_json(&opts(&[service.to_str().unwrap()])).unwrap_err();
        assert!(matches!(error, Error::Decode { .. }));
        assert_eq!(error.exit_code(), exitcode::DATAERR);

        let config = write_file(dir.path(), "parser.toml", "bogus = true\n");
        let error = convert_to_json(&opts(&["--config", config.to_str().unwrap()])).unwrap_err();
        assert!(matches!(error, Error::Config { .. }));
        assert_eq!(error.exit_code(), exitcode::CONFIG);
    }

    #[test]
    fn pretty_output() {
        let dir = tempfile::tempdir().unwrap();
        let pod = write_file(
            dir.path(),
            "pod.json",
            r#"{"apiVersion": "v1", "kind": "Pod", "metadata": {"name": "solo"}}"#,
        );

        let mut out = Vec::new();
        let count = convert(&opts(&["--pretty", pod.to_str().unwrap()]), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(count, 1);
        assert!(text.starts_with("[\n  {\n    \"name\": \"solo\""), "{text}");
        assert!(text.ends_with("]\n"));
    }
}
