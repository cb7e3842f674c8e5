use chrono::Utc;
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wavelet_convert::translator::CharPredicate;
use wavelet_convert::{
    CharFilter, ConvertError, ConverterConfigBuilder, EvictionPolicy, WaveletConverter,
};
use wavelet_ops::{
    DocOp, DocState, DocumentId, OperationContext, ParticipantId, WaveletOperation, WaveletState,
};

type Translator = Arc<CharFilter<CharPredicate>>;

const ALPHABET: [char; 8] = ['a', 'e', 'o', 'n', ' ', '.', '\n', '\u{1}'];

/// Statistics collected during stress testing
#[derive(Clone, Debug)]
pub struct StressTestStats {
    pub num_wavelets: usize,
    pub operations_per_wavelet: usize,
    pub total_operations: u64,
    pub converters_created: u64,
    pub converters_evicted: u64,
    pub peak_tracked: usize,
    pub peak_tracked_without_eviction: usize,
    pub mismatches: usize,
    pub total_time: Duration,
    pub ops_per_second: f64,
}

impl StressTestStats {
    pub fn print(&self) {
        println!("\n╔════════════════════════════════════════════════════════════╗");
        println!("║              Stress Test Statistics                         ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║  Number of Wavelets:        {:>38} ║", self.num_wavelets);
        println!("║  Operations per Wavelet:    {:>38} ║", self.operations_per_wavelet);
        println!("║  Total Operations:          {:>38} ║", self.total_operations);
        println!("║  Converters Created:        {:>38} ║", self.converters_created);
        println!("║  Converters Evicted:        {:>38} ║", self.converters_evicted);
        println!("║  Peak Live (evicting):      {:>38} ║", self.peak_tracked);
        println!("║  Peak Live (never evicting):{:>38} ║", self.peak_tracked_without_eviction);
        println!("║  Mismatched Wavelets:       {:>38} ║", self.mismatches);
        println!("║  Total Time:                {:>39}s ║", format!("{:.3}", self.total_time.as_secs_f64()));
        println!("║  Operations/Second:         {:>38.0} ║", self.ops_per_second);
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

/// Result of converting one wavelet twice, with and without eviction.
#[derive(Clone, Debug)]
struct WaveletReport {
    operations: u64,
    converters_created: u64,
    converters_evicted: u64,
    peak_tracked: usize,
    peak_tracked_without_eviction: usize,
    matches_reference: bool,
}

/// Generate a valid wavelet stream with many short-lived documents.
///
/// Documents are created, edited a few times and then usually emptied, so
/// an evicting converter only holds the ones that still have content.
pub fn generate_wavelet(seed: u64, num_ops: usize) -> Vec<WaveletOperation> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = Utc::now().timestamp_millis().max(0) as u64;
    let creator = ParticipantId::new(format!("user{}@example.com", seed));

    let mut ops = Vec::with_capacity(num_ops + 1);
    ops.push(WaveletOperation::add_participant(
        OperationContext::new(creator.clone(), start),
        creator.clone(),
    ));

    let mut live: Vec<(DocumentId, DocState)> = Vec::new();
    let mut guests: Vec<ParticipantId> = Vec::new();

    for i in 0..num_ops {
        let context = OperationContext::new(creator.clone(), start + i as u64 + 1);
        let roll = rng.gen_range(0..100);

        let op = if roll < 10 || (live.is_empty() && roll >= 30) {
            structural_op(&mut rng, context, &mut guests, seed, i)
        } else if roll < 30 {
            let id = DocumentId::generate();
            let op = DocOp::initialization(&random_text(&mut rng));
            live.push((id.clone(), DocState::new()));
            apply_to_last(&mut live, context, id, op)
        } else {
            let index = rng.gen_range(0..live.len());
            let (id, doc) = live.swap_remove(index);
            let op = edit_op(&mut rng, &doc, roll >= 85);
            live.push((id.clone(), doc));
            apply_to_last(&mut live, context, id, op)
        };

        live.retain(|(_, doc)| !doc.is_empty());
        ops.push(op);
    }

    ops
}

fn structural_op(
    rng: &mut StdRng,
    context: OperationContext,
    guests: &mut Vec<ParticipantId>,
    seed: u64,
    i: usize,
) -> WaveletOperation {
    match rng.gen_range(0..3) {
        0 => WaveletOperation::no_op(context),
        1 if !guests.is_empty() => {
            let guest = guests.swap_remove(rng.gen_range(0..guests.len()));
            WaveletOperation::remove_participant(context, guest)
        }
        _ => {
            let guest = ParticipantId::new(format!("guest{}-{}@example.com", seed, i));
            guests.push(guest.clone());
            WaveletOperation::add_participant(context, guest)
        }
    }
}

fn edit_op(rng: &mut StdRng, doc: &DocState, delete_all: bool) -> DocOp {
    if delete_all {
        return DocOp::delete_all(doc);
    }
    if rng.gen_bool(0.6) {
        let position = rng.gen_range(0..=doc.len());
        return DocOp::insert_at(doc.len(), position, &random_text(rng));
    }
    let start = rng.gen_range(0..doc.len());
    let end = (start + rng.gen_range(1..4)).min(doc.len());
    DocOp::delete_range(doc, start, end).unwrap_or_else(|_| DocOp::delete_all(doc))
}

/// Advance the model for the last live document and wrap `op`.
fn apply_to_last(
    live: &mut [(DocumentId, DocState)],
    context: OperationContext,
    id: DocumentId,
    op: DocOp,
) -> WaveletOperation {
    if let Some((_, doc)) = live.last_mut() {
        if let Ok(next) = op.apply(doc) {
            *doc = next;
        }
    }
    WaveletOperation::content(context, id, op)
}

fn random_text(rng: &mut StdRng) -> String {
    let len = rng.gen_range(1..8);
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
        .collect()
}

fn convert_wavelet(
    name: String,
    translator: Translator,
    stream: &[WaveletOperation],
) -> Result<WaveletReport, ConvertError> {
    let config = ConverterConfigBuilder::new().wavelet_id(name.clone()).build();
    let mut converter = WaveletConverter::with_config(Arc::clone(&translator), config);

    let reference_config = ConverterConfigBuilder::new()
        .wavelet_id(name)
        .eviction(EvictionPolicy::Never)
        .build();
    let mut reference = WaveletConverter::with_config(translator, reference_config);

    let mut destination = WaveletState::new("destination");
    let mut matches_reference = true;

    for op in stream {
        let converted = converter.convert_and_apply(op)?;
        let expected = reference.convert_and_apply(op)?;
        matches_reference &= converted == expected;
        matches_reference &= destination.apply(&converted).is_ok();
    }

    let mut source = WaveletState::new("source");
    matches_reference &= source.apply_all(stream).is_ok();
    for (id, doc) in source.documents() {
        let expected: String = doc
            .text()
            .chars()
            .filter(|c| *c == '\n' || !c.is_control())
            .collect();
        matches_reference &= destination.document(id).map(|d| d.text()) == Some(expected);
    }

    let stats = converter.stats();
    Ok(WaveletReport {
        operations: stats.operations,
        converters_created: stats.converters_created,
        converters_evicted: stats.converters_evicted,
        peak_tracked: stats.peak_tracked,
        peak_tracked_without_eviction: reference.stats().peak_tracked,
        matches_reference,
    })
}

/// Convert many wavelets in parallel, one converter per wavelet.
pub async fn stress_test_conversion(num_wavelets: usize, ops_per_wavelet: usize) -> StressTestStats {
    println!("\n╔════════════════════════════════════════════════════════════╗");
    println!("║        Wavelet Conversion Stress Test                      ║");
    println!("║  Wavelets: {} | Ops/Wavelet: {} ║", num_wavelets, ops_per_wavelet);
    println!("╚════════════════════════════════════════════════════════════╝");

    println!("\n[Phase 1/2] Generating wavelet histories...");
    let streams: Vec<Arc<Vec<WaveletOperation>>> = (0..num_wavelets)
        .map(|i| Arc::new(generate_wavelet(i as u64, ops_per_wavelet)))
        .collect();
    println!("[Phase 1/2] ✓ Completed");

    println!("[Phase 2/2] Converting wavelets...");
    let start = Instant::now();
    let translator: Translator = Arc::new(CharFilter::strip_control());

    let handles = streams.iter().enumerate().map(|(i, stream)| {
        let stream = Arc::clone(stream);
        let translator = Arc::clone(&translator);
        tokio::task::spawn_blocking(move || {
            convert_wavelet(format!("w+stress{}", i), translator, &stream)
        })
    });

    let mut stats = StressTestStats {
        num_wavelets,
        operations_per_wavelet: ops_per_wavelet,
        total_operations: 0,
        converters_created: 0,
        converters_evicted: 0,
        peak_tracked: 0,
        peak_tracked_without_eviction: 0,
        mismatches: 0,
        total_time: Duration::ZERO,
        ops_per_second: 0.0,
    };

    for result in join_all(handles).await {
        match result {
            Ok(Ok(report)) => {
                stats.total_operations += report.operations;
                stats.converters_created += report.converters_created;
                stats.converters_evicted += report.converters_evicted;
                stats.peak_tracked = stats.peak_tracked.max(report.peak_tracked);
                stats.peak_tracked_without_eviction = stats
                    .peak_tracked_without_eviction
                    .max(report.peak_tracked_without_eviction);
                if !report.matches_reference {
                    stats.mismatches += 1;
                }
            }
            Ok(Err(err)) => {
                tracing::error!(error = %err, "wavelet conversion failed");
                stats.mismatches += 1;
            }
            Err(err) => {
                tracing::error!(error = %err, "conversion task panicked");
                stats.mismatches += 1;
            }
        }
    }

    stats.total_time = start.elapsed();
    stats.ops_per_second = stats.total_operations as f64 / stats.total_time.as_secs_f64();
    println!("[Phase 2/2] ✓ Completed");

    stats
}

/// Run the conversion stress test at growing wavelet counts.
pub async fn stress_test_scaling(max_wavelets: usize, step_size: usize) {
    println!("\n╔════════════════════════════════════════════════════════════╗");
    println!("║      Scaling Analysis - Conversion vs Wavelet Count        ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    let mut current = step_size;
    while current <= max_wavelets {
        let stats = stress_test_conversion(current, 200).await;
        stats.print();
        current += step_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_stream_is_valid() {
        let stream = generate_wavelet(7, 300);
        let mut wavelet = WaveletState::new("w+test");
        wavelet.apply_all(&stream).unwrap();
        assert_eq!(stream.len(), 301);
    }

    #[test]
    fn test_generation_is_seeded() {
        let a = generate_wavelet(3, 50);
        let b = generate_wavelet(3, 50);
        let kinds = |s: &[WaveletOperation]| s.iter().map(|op| op.op_kind()).collect::<Vec<_>>();
        assert_eq!(kinds(&a), kinds(&b));
    }

    #[test]
    fn test_convert_wavelet_matches_reference() {
        let stream = generate_wavelet(11, 400);
        let report = convert_wavelet(
            "w+test".to_string(),
            Arc::new(CharFilter::strip_control()),
            &stream,
        )
        .unwrap();

        assert!(report.matches_reference);
        assert_eq!(report.operations, 401);
        assert!(report.peak_tracked <= report.peak_tracked_without_eviction);
    }
}
