use mesh_pods::{app, cli::Opts};

fn main() {
    let opts = Opts::get_matches();
    let code = app::run(&opts);
    std::process::exit(code);
}
