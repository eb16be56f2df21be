mod block;
mod board;
mod cache;
mod parser;
mod render;
mod solver;
mod utils;

use board::Board;
use parser::{BoardParser, LocalReader, NetworkReader};
use render::{Renderer, ShellRenderer};
use solver::{line::TraceSolver, Outcome};
use utils::rc::MutRc;

#[macro_use]
extern crate clap;

use clap::{App, ArgGroup, ArgMatches};

fn main() {
    env_logger::init();

    let matches = App::new("Runogram")
        .version(crate_version!())
        .about("Nonogram solver")
        .args_from_usage(
            "-b, --my [PATH]     'path to TOML-formatted nonogram file'
             -p, --webpbn [PATH] 'path to Jan Wolter's http://webpbn.com XML-formatted file'
             -w, --webpbn-online [ID] 'id of the http://webpbn.com puzzle'",
        )
        .group(ArgGroup::with_name("source").required(true).args(&[
            "my",
            "webpbn",
            "webpbn-online",
        ]))
        .get_matches();

    let (source, path) = source_from_args(&matches);

    let board = match source {
        Source::Own => parser::MyFormat::read_local(&path).unwrap().parse(),
        Source::WebPbn => parser::WebPbn::read_local(&path).unwrap().parse(),
        Source::WebPbnOnline => parser::WebPbn::read_remote(&path).unwrap().parse(),
    }
    .unwrap();

    run(board);
}

fn run(board: Board) {
    let board = MutRc::new(board);

    let renderer = ShellRenderer::with_board(MutRc::clone(&board));

    let result = solver::run::<TraceSolver>(&board).unwrap();
    println!("{}", renderer.render());

    if result == Outcome::NoSolutionFound {
        println!("The puzzle is not solved to the end: unknown cells are shown as '?'.");
    }
}

fn source_from_args(matches: &ArgMatches) -> (Source, String) {
    let my_path = matches.value_of("my");
    let webpbn_path = matches.value_of("webpbn");
    let webpbn_id = matches.value_of("webpbn-online");

    if let Some(webpbn_path) = webpbn_path {
        return (Source::WebPbn, webpbn_path.to_string());
    } else if let Some(webpbn_id) = webpbn_id {
        value_t_or_exit!(matches, "webpbn-online", u16);
        return (Source::WebPbnOnline, webpbn_id.to_string());
    } else if let Some(my_path) = my_path {
        return (Source::Own, my_path.to_string());
    }
    panic!("No valid source found");
}

enum Source {
    Own,
    WebPbn,
    WebPbnOnline,
}
