use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::{get, middleware, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use word_graph_core::model::bridge::query_bridge_words;
use word_graph_core::model::generator::generate_new_text;
use word_graph_core::model::shortest_path::{shortest_paths, shortest_paths_from};
use word_graph_core::model::walk::{random_walk, WalkPolicy};
use word_graph_core::{GraphError, WordGraph};

/// Command-line (and environment) configuration of the server.
#[derive(Parser, Debug)]
#[command(name = "word-graph-server", about = "Serve word graph queries over HTTP")]
struct Args {
	/// Corpus text file the graph is built from
	#[arg(long, env = "WORD_GRAPH_CORPUS")]
	corpus: PathBuf,

	/// Address to bind
	#[arg(long, env = "WORD_GRAPH_HOST", default_value = "127.0.0.1")]
	host: String,

	/// Port to bind
	#[arg(long, env = "WORD_GRAPH_PORT", default_value_t = 5000)]
	port: u16,
}

/// Query parameters for `/v1/bridge` and `/v1/shortest_path`
#[derive(Deserialize)]
struct PairParams {
	from: Option<String>,
	to: Option<String>,
}

/// Query parameters for `/v1/generate`
#[derive(Deserialize)]
struct GenerateParams {
	text: Option<String>,
	seed: Option<u64>,
}

/// Query parameters for `/v1/walk`
#[derive(Deserialize)]
struct WalkParams {
	seed: Option<u64>,
	policy: Option<String>,
}

/// Returns the trimmed value of a required, non-empty parameter.
fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, HttpResponse> {
	match value {
		Some(s) if !s.trim().is_empty() => Ok(s.trim()),
		_ => Err(HttpResponse::BadRequest().body(format!("Missing or empty parameter '{name}'"))),
	}
}

/// Seeded generator if a seed is given, OS entropy otherwise.
fn make_rng(seed: Option<u64>) -> StdRng {
	match seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	}
}

fn error_response(err: GraphError) -> HttpResponse {
	match err {
		GraphError::NodeNotFound { .. } => HttpResponse::NotFound().body(err.to_string()),
		_ => {
			log::error!("Query failed: {err}");
			HttpResponse::InternalServerError().body(err.to_string())
		}
	}
}

/// HTTP GET endpoint `/v1/graph`
///
/// Returns every node and weighted edge, for drawing the graph.
#[get("/v1/graph")]
async fn get_graph(graph: web::Data<WordGraph>) -> impl Responder {
	HttpResponse::Ok().json(graph.topology())
}

/// HTTP GET endpoint `/v1/bridge`
///
/// Returns a tagged outcome: `found`, `no_bridge` or `missing_nodes`.
/// A missing word is a valid outcome here, not a 404.
#[get("/v1/bridge")]
async fn get_bridge(graph: web::Data<WordGraph>, query: web::Query<PairParams>) -> impl Responder {
	let from = match required(&query.from, "from") {
		Ok(s) => s,
		Err(response) => return response,
	};
	let to = match required(&query.to, "to") {
		Ok(s) => s,
		Err(response) => return response,
	};
	HttpResponse::Ok().json(query_bridge_words(&graph, from, to))
}

/// HTTP GET endpoint `/v1/generate`
///
/// Inserts random bridge words into `text`. `seed` makes the choice reproducible.
#[get("/v1/generate")]
async fn get_generated(graph: web::Data<WordGraph>, query: web::Query<GenerateParams>) -> impl Responder {
	let text = match required(&query.text, "text") {
		Ok(s) => s,
		Err(response) => return response,
	};
	let mut rng = make_rng(query.seed);
	HttpResponse::Ok().json(generate_new_text(&graph, text, &mut rng))
}

/// HTTP GET endpoint `/v1/shortest_path`
///
/// - With `to`: every tied shortest path, or `null` when unreachable
/// - Without `to`: one shortest path per reachable word, keyed by word
#[get("/v1/shortest_path")]
async fn get_shortest_path(graph: web::Data<WordGraph>, query: web::Query<PairParams>) -> impl Responder {
	let from = match required(&query.from, "from") {
		Ok(s) => s,
		Err(response) => return response,
	};

	match query.to.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
		Some(to) => match shortest_paths(&graph, from, to) {
			Ok(paths) => HttpResponse::Ok().json(paths),
			Err(e) => error_response(e),
		},
		None => match shortest_paths_from(&graph, from) {
			Ok(paths) => HttpResponse::Ok().json(paths),
			Err(e) => error_response(e),
		},
	}
}

/// HTTP GET endpoint `/v1/walk`
///
/// Runs one complete random walk; `null` if the graph is empty.
#[get("/v1/walk")]
async fn get_walk(graph: web::Data<WordGraph>, query: web::Query<WalkParams>) -> impl Responder {
	let policy = match query.policy.as_deref() {
		None => WalkPolicy::default(),
		Some(s) => match s.parse::<WalkPolicy>() {
			Ok(policy) => policy,
			Err(e) => return HttpResponse::BadRequest().body(e),
		},
	};
	let mut rng = make_rng(query.seed);
	HttpResponse::Ok().json(random_walk(&graph, policy, &mut rng))
}

fn routes(cfg: &mut web::ServiceConfig) {
	cfg.service(get_graph)
		.service(get_bridge)
		.service(get_generated)
		.service(get_shortest_path)
		.service(get_walk);
}

/// Main entry point for the server.
///
/// Builds the graph once, shares it read-only between workers (no lock is
/// needed since it is never mutated) and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let graph = WordGraph::from_file(&args.corpus).map_err(std::io::Error::other)?;
	let shared_graph = web::Data::new(graph);
	log::info!("Serving word graph on {}:{}", args.host, args.port);

	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET"]))
			.app_data(shared_graph.clone())
			.configure(routes)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await
}
