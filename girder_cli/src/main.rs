//! # Girder CLI
//!
//! Runs a time-dependent loss analysis and prints the loss table and a
//! capacity summary at the end of the timeline.
//!
//! ```text
//! girder_cli [MODEL.json] [--json RESULTS.json] [--save-demo MODEL.json]
//! ```
//!
//! Without a model file a built-in pretensioned girder with a composite
//! deck is analyzed. Set `RUST_LOG=girder_core=debug` for per-interval logs.

use std::path::PathBuf;
use std::process::ExitCode;

use girder_core::aging::Exposure;
use girder_core::capacity::{BendingSense, CapacitySection, ShearReinforcement};
use girder_core::loads::{AppliedLoadTable, LimitState, LiveLoadEnvelope, ProductLoad};
use girder_core::materials::{ConcreteMaterial, MaterialCatalog};
use girder_core::section::properties::Trapezoid;
use girder_core::section::{ConcretePart, ConcretePartKind, PointOfInterest, StrandPart};
use girder_core::timeline::{ConstructionEvent::*, Timeline};
use girder_core::units::{Feet, Inches, KipFt, KipIn};
use girder_core::{load_model, run, save_json, CalcError, CalcResult, GirderModel};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default)]
struct Args {
    model: Option<PathBuf>,
    json: Option<PathBuf>,
    save_demo: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--json" => args.json = Some(it.next().ok_or("--json needs a path")?.into()),
            "--save-demo" => args.save_demo = Some(it.next().ok_or("--save-demo needs a path")?.into()),
            "-h" | "--help" => {
                return Err("usage: girder_cli [MODEL.json] [--json RESULTS.json] [--save-demo MODEL.json]".to_string())
            }
            other if other.starts_with('-') => return Err(format!("unknown option '{}'", other)),
            path => args.model = Some(path.into()),
        }
    }
    Ok(args)
}

// ============================================================================
// Demo model: 100 ft span, bulb girder with an 8 in composite deck
// ============================================================================

const SPAN_FT: f64 = 100.0;

fn girder_shape() -> Vec<Trapezoid> {
    vec![
        Trapezoid::rectangle(0.0, 36.0, 6.0),
        Trapezoid::rectangle(6.0, 8.0, 36.0),
        Trapezoid::rectangle(42.0, 24.0, 6.0),
    ]
}

fn deck_shape() -> Trapezoid {
    Trapezoid::rectangle(-8.0, 96.0, 8.0)
}

/// Simple span moment (kip-in) and shear (kip) for a uniform load `w_klf` at `x_ft`
fn simple_span(w_klf: f64, x_ft: f64) -> (f64, f64) {
    let moment: KipIn = KipFt(w_klf * x_ft * (SPAN_FT - x_ft) / 2.0).into();
    (moment.0, w_klf * (SPAN_FT / 2.0 - x_ft))
}

fn demo_model() -> CalcResult<GirderModel> {
    let timeline = Timeline::builder()
        .interval("Stress strands", 1.0, &[CastSegment, StressStrands])
        .interval("Release", 0.5, &[ReleasePrestress])
        .interval("Storage", 58.5, &[StoreSegment])
        .interval("Erect", 1.0, &[ErectSegment])
        .interval("Cast deck", 1.0, &[CastDeck])
        .interval("Deck curing", 7.0, &[CompositeDeck])
        .interval("Railing", 1.0, &[InstallRailing])
        .interval("Open to traffic", 30.0, &[OpenToTraffic])
        .interval("Service life", 20_000.0, &[EndOfService])
        .build()?;

    let materials = MaterialCatalog::standard()
        .with_concrete(ConcreteMaterial::normal("Girder 8 ksi", 8.0, 6.0))
        .with_concrete(ConcreteMaterial::normal("Deck 4 ksi", 4.0, 3.0));
    let deck_cast = timeline.interval(4)?.start_days;

    let mut loads = AppliedLoadTable::new();
    let length: Inches = Feet(SPAN_FT).into();
    let mut model = GirderModel::new("Demo 100 ft girder", "Span 1", timeline, materials).with_girder_length(length.0);
    for (id, x_ft) in [(0, 5.0), (1, 25.0), (2, SPAN_FT / 2.0)] {
        let x: Inches = Feet(x_ft).into();
        let girder = ConcretePart::from_shape(
            "Girder",
            ConcretePartKind::Segment,
            "Girder 8 ksi",
            &girder_shape(),
            Exposure::new(3.5, 70.0, 1.0),
            0.0,
            1,
        )?;
        let deck = ConcretePart::from_shape(
            "Deck",
            ConcretePartKind::Deck,
            "Deck 4 ksi",
            &[deck_shape()],
            Exposure::new(4.0, 70.0, 1.0),
            deck_cast,
            5,
        )?;
        let capacity = girder_shape()
            .into_iter()
            .fold(CapacitySection::new(), |c, t| c.with_region("Girder", t))
            .with_region("Deck", deck_shape())
            .with_shear(ShearReinforcement {
                bv_in: 8.0,
                av_in2: 0.4,
                spacing_in: 12.0,
                material: "A615 Gr 60".to_string(),
            });
        model = model.with_poi(
            PointOfInterest::new(id, "Span 1", x.0)
                .with_concrete(girder)
                .with_concrete(deck)
                .with_strand(StrandPart::straight("Straight", "0.6in Gr270 LR", 24, 44.0, 202.5, 0, 1))
                .with_capacity(capacity),
        );

        for (interval, load, w) in [
            (1, ProductLoad::Girder, 0.675),
            (4, ProductLoad::Slab, 0.8),
            (6, ProductLoad::Railing, 0.2),
        ] {
            let (m, v) = simple_span(w, x_ft);
            loads = loads.with_load(id, interval, load, 0.0, m, v);
        }
        let (m_ll, v_ll) = simple_span(1.2, x_ft);
        loads = loads.with_live_load(LiveLoadEnvelope {
            poi_id: id,
            moment_min_kipin: 0.0,
            moment_max_kipin: m_ll,
            shear_max_kip: v_ll.abs() * 1.5,
        });
    }
    Ok(model.with_loads(loads))
}

// ============================================================================
// Report
// ============================================================================

fn status_icon(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "NG"
    }
}

fn report(model: &GirderModel, args: &Args) -> CalcResult<()> {
    let results = run(model)?;
    let last = model.timeline.last_index();

    println!("═══════════════════════════════════════════════════════════════════════");
    println!("  {} ({} intervals)", model.meta.name, model.timeline.len());
    println!("═══════════════════════════════════════════════════════════════════════");
    println!();
    println!("Prestress losses at end of service:");
    println!(
        "  {:>4} {:<12} {:>8} {:>8} {:>8} {:>6} {:>7} {:>7} {:>7}",
        "POI", "Element", "fpj", "fpe", "loss", "%", "CR", "SH", "RE"
    );
    for row in results.loss_summary(last)? {
        println!(
            "  {:>4} {:<12} {:>8.2} {:>8.2} {:>8.2} {:>6.1} {:>7.2} {:>7.2} {:>7.2}",
            row.poi_id,
            row.element,
            row.jacking_ksi,
            row.effective_ksi,
            row.loss_ksi,
            row.loss_percent(),
            row.creep_ksi,
            row.shrinkage_ksi,
            row.relaxation_ksi
        );
    }

    if let Some(first) = results.all_details().first() {
        println!();
        println!("Effective prestress history at POI {}:", first.poi_id());
        for (interval, result) in model.timeline.intervals().iter().zip(first.intervals()) {
            let fpe: Vec<String> = result
                .strands
                .iter()
                .map(|s| format!("{} {:.2}", s.name, s.effective_stress_ksi()))
                .chain(result.tendons.iter().map(|t| format!("Duct {} {:.2}", t.duct, t.effective_stress_ksi())))
                .collect();
            println!(
                "  {:>2} {:<18} {:>9.1} d  {}",
                interval.index,
                interval.description,
                interval.end_days,
                fpe.join(", ")
            );
        }
    }

    println!();
    println!("Capacity at end of service (Strength I, positive bending):");
    for (poi, outcome) in results
        .capacity(model)
        .analyze_all(last, LimitState::StrengthI, BendingSense::Positive)
    {
        match outcome {
            Ok(cap) => {
                println!(
                    "  POI {:>2}: Mu {:>9.0}  Mr {:>9.0} kip-in {}  ({}, phi {:.2})",
                    poi,
                    cap.demand.mu_kipin,
                    cap.moment.mr_kipin,
                    status_icon(cap.moment_ok()),
                    cap.moment.controlling,
                    cap.moment.phi
                );
                for d in cap.development.iter().filter(|d| !d.is_fully_developed()) {
                    println!(
                        "          {} bonded {:.0} in of ld {:.0} in, bond factor {:.2}",
                        d.strand, d.bonded_length_in, d.development_length_in, d.bond_factor
                    );
                }
                println!(
                    "          Mcr {:>8.0} kip-in  minimum reinforcement {}",
                    cap.cracking.mcr_kipin,
                    status_icon(cap.minimum_reinforcement.satisfied)
                );
                if let Some(shear) = &cap.shear {
                    println!(
                        "          Vu {:>9.1}  Vr {:>9.1} kip {}",
                        cap.demand.vu_kip,
                        shear.vr_kip,
                        status_icon(shear.vr_kip >= cap.demand.vu_kip)
                    );
                }
            }
            Err(e) => println!("  POI {:>2}: {} [{}]", poi, e, e.error_code()),
        }
    }

    if let Some(path) = &args.json {
        save_json(&results, path)?;
        println!();
        println!("Results written to {}", path.display());
    }
    Ok(())
}

fn print_error(e: &CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "girder_core=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::FAILURE;
        }
    };

    let model = match &args.model {
        Some(path) => load_model(path),
        None => demo_model(),
    };
    let outcome = model.and_then(|model| {
        if let Some(path) = &args.save_demo {
            save_json(&model, path)?;
            tracing::info!(path = %path.display(), "model written");
        }
        report(&model, &args)
    });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}
