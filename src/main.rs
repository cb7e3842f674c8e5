use stress_test::{stress_test_conversion, stress_test_scaling};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use wavelet_convert::{CharFilter, ConvertError, OpTranslator, WaveletConverter};
use wavelet_index::{describe, extract_title, MANIFEST_DOCUMENT_ID};
use wavelet_ops::{
    DocOp, DocState, DocumentId, OpError, OperationContext, ParticipantId, WaveletOperation,
    WaveletState,
};
pub mod stress_test;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let rt = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");
    rt.block_on(async_main());
}

/// A short conversation: a manifest, a root blip that is typed, emptied and
/// retyped, and a reply.
fn demo_stream() -> Vec<WaveletOperation> {
    let alice = ParticipantId::new("alice@example.com");
    let bob = ParticipantId::new("bob@example.com");
    let ctx = |who: &ParticipantId, t: u64| OperationContext::new(who.clone(), t);
    let root = DocumentId::from("b+root");
    let reply = DocumentId::from("b+reply");

    vec![
        WaveletOperation::add_participant(ctx(&alice, 1), alice.clone()),
        WaveletOperation::add_participant(ctx(&alice, 2), bob.clone()),
        WaveletOperation::content(
            ctx(&alice, 3),
            DocumentId::from(MANIFEST_DOCUMENT_ID),
            DocOp::initialization("b+root\nb+reply"),
        ),
        WaveletOperation::content(ctx(&alice, 4), root.clone(), DocOp::initialization("Hi")),
        WaveletOperation::content(ctx(&alice, 5), root.clone(), DocOp::insert_at(2, 2, "!")),
        WaveletOperation::content(
            ctx(&alice, 6),
            root.clone(),
            DocOp::delete_all(&DocState::from_text("Hi!")),
        ),
        WaveletOperation::content(
            ctx(&alice, 7),
            root,
            DocOp::initialization("Trip\u{7} planning\nWhere to? Somewhere warm."),
        ),
        WaveletOperation::content(ctx(&bob, 8), reply, DocOp::initialization("Lisbon!\u{1}")),
        WaveletOperation::no_op(ctx(&bob, 9)),
    ]
}

/// Errors that end a replay.
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Conversion failed: {0}")]
    Convert(#[from] ConvertError),

    #[error("Converted operation does not apply to the destination: {0}")]
    Destination(#[from] OpError),
}

/// Convert `stream` and apply every converted operation to a fresh
/// destination wavelet.
fn replay<T: OpTranslator>(
    converter: &mut WaveletConverter<T>,
    stream: &[WaveletOperation],
) -> Result<WaveletState, ReplayError> {
    let mut destination = WaveletState::new("w+demo");
    for op in stream {
        let converted = converter.convert_and_apply(op)?;
        println!("  {}", converted);
        destination.apply(&converted)?;
    }
    Ok(destination)
}

fn replay_demo() -> Result<(), ReplayError> {
    let mut converter = WaveletConverter::new(CharFilter::strip_control());
    let destination = replay(&mut converter, &demo_stream())?;

    println!("\n  {}", converter);
    println!("  Title: {:?}", extract_title(&destination));
    println!("\n{}", describe(&destination));
    Ok(())
}

async fn async_main() {
    println!("\n\n╔════════════════════════════════════════════════════════════╗");
    println!("║            DEMO REPLAY                                      ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    if let Err(err) = replay_demo() {
        tracing::error!(error = %err, "demo replay failed");
    }

    println!("\n\n╔════════════════════════════════════════════════════════════╗");
    println!("║            ASYNC STRESS TESTS                               ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    // Test 1: small scale
    let stats = stress_test_conversion(4, 200).await;
    stats.print();

    // Test 2: medium scale
    let stats = stress_test_conversion(16, 2000).await;
    stats.print();

    // Test 3: scaling analysis
    stress_test_scaling(32, 8).await;

    println!("\n✓ All stress tests completed successfully!");
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavelet_convert::translator::from_fn;
    use wavelet_ops::DocOpBuilder;

    #[test]
    fn test_demo_replay_title() {
        let mut converter = WaveletConverter::new(CharFilter::strip_control());
        let destination = replay(&mut converter, &demo_stream()).unwrap();
        assert_eq!(extract_title(&destination), "Trip planning");
    }

    #[test]
    fn test_replay_stops_when_destination_diverges() {
        // Deletes text the destination never received.
        let mut converter = WaveletConverter::new(from_fn(|_id, _op: &DocOp| {
            Ok(DocOpBuilder::new().delete("zz").build())
        }));
        let err = replay(&mut converter, &demo_stream()).unwrap_err();
        assert!(matches!(err, ReplayError::Destination(OpError::DeletePastEnd { .. })));
    }
}
