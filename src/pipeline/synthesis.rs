//! Chunk fan-out to the speech provider with ordered reassembly.
//!
//! Chunk requests are independent, so with `parallelism > 1` a scoped worker
//! pool pulls them from a channel. Results carry their chunk index and are
//! concatenated by index, never by completion order.

use crate::collab::{CollabResult, CollaboratorError, SpeechRequest, SpeechSynthesisProvider};
use crate::segment::SpeechText;
use crossbeam_channel::unbounded;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::debug;

/// Voice and encoding shared by every chunk of one job.
#[derive(Debug, Clone, Copy)]
pub struct Voice<'a> {
    pub voice_id: &'a str,
    pub output_format: &'a str,
}

/// Synthesize every chunk and return the concatenated audio.
///
/// Any chunk failure, or a chunk that yields no audio, fails the whole call;
/// no partial audio is returned.
pub fn synthesize_chunks(
    provider: &dyn SpeechSynthesisProvider,
    chunks: &[SpeechText],
    voice: Voice<'_>,
    parallelism: usize,
) -> CollabResult<Vec<u8>> {
    let workers = parallelism.clamp(1, chunks.len().max(1));
    let parts = if workers == 1 {
        chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| synthesize_one(provider, index, chunk, voice))
            .collect::<CollabResult<Vec<_>>>()?
    } else {
        fan_out(provider, chunks, voice, workers)?
    };

    Ok(parts.concat())
}

fn synthesize_one(
    provider: &dyn SpeechSynthesisProvider,
    index: usize,
    chunk: &SpeechText,
    voice: Voice<'_>,
) -> CollabResult<Vec<u8>> {
    let request = SpeechRequest {
        text: &chunk.body,
        kind: chunk.kind,
        voice_id: voice.voice_id,
        output_format: voice.output_format,
    };
    let audio = provider.synthesize(&request)?;
    if audio.is_empty() {
        return Err(CollaboratorError::Synthesis {
            message: format!("chunk {index} produced no audio"),
        });
    }
    debug!(chunk = index, bytes = audio.len(), "synthesized chunk");
    Ok(audio)
}

fn fan_out(
    provider: &dyn SpeechSynthesisProvider,
    chunks: &[SpeechText],
    voice: Voice<'_>,
    workers: usize,
) -> CollabResult<Vec<Vec<u8>>> {
    let (job_tx, job_rx) = unbounded::<(usize, &SpeechText)>();
    let (result_tx, result_rx) = unbounded::<(usize, CollabResult<Vec<u8>>)>();
    for job in chunks.iter().enumerate() {
        if job_tx.send(job).is_err() {
            break;
        }
    }
    drop(job_tx);

    let failed = AtomicBool::new(false);
    let mut panicked = false;

    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let failed = &failed;
                scope.spawn(move || {
                    for (index, chunk) in job_rx.iter() {
                        if failed.load(Ordering::Relaxed) {
                            break;
                        }
                        let result = synthesize_one(provider, index, chunk, voice);
                        if result.is_err() {
                            failed.store(true, Ordering::Relaxed);
                        }
                        if result_tx.send((index, result)).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            panicked |= handle.join().is_err();
        }
    });
    drop(result_tx);

    if panicked {
        return Err(CollaboratorError::Synthesis {
            message: "synthesis worker panicked".to_string(),
        });
    }

    let mut parts: Vec<Option<Vec<u8>>> = vec![None; chunks.len()];
    let mut first_error: Option<(usize, CollaboratorError)> = None;
    for (index, result) in result_rx.iter() {
        match result {
            Ok(audio) => parts[index] = Some(audio),
            Err(err) => {
                if first_error.as_ref().is_none_or(|(seen, _)| index < *seen) {
                    first_error = Some((index, err));
                }
            }
        }
    }
    if let Some((_, err)) = first_error {
        return Err(err);
    }

    parts
        .into_iter()
        .enumerate()
        .map(|(index, part)| {
            part.ok_or_else(|| CollaboratorError::Synthesis {
                message: format!("chunk {index} was never synthesized"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::mock::MockSpeechProvider;
    use crate::segment::TextKind;
    use std::time::Duration;

    const VOICE: Voice<'static> = Voice {
        voice_id: "Joanna",
        output_format: "mp3",
    };

    fn plain(chunks: &[&str]) -> Vec<SpeechText> {
        chunks
            .iter()
            .map(|body| SpeechText {
                body: body.to_string(),
                kind: TextKind::Plain,
            })
            .collect()
    }

    /// Sleeps longer for earlier chunks so completion order is reversed.
    struct ReversingProvider {
        total: u64,
    }

    impl SpeechSynthesisProvider for ReversingProvider {
        fn synthesize(&self, request: &SpeechRequest<'_>) -> CollabResult<Vec<u8>> {
            let index: u64 = request.text.parse().unwrap_or(0);
            thread::sleep(Duration::from_millis((self.total - index) * 15));
            Ok(request.text.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_sequential_concatenates_in_order() {
        let provider = MockSpeechProvider::new();
        let audio = synthesize_chunks(&provider, &plain(&["a", "b", "c"]), VOICE, 1).unwrap();
        assert_eq!(audio, b"[a][b][c]".to_vec());
    }

    #[test]
    fn test_parallel_reassembles_by_index_not_completion() {
        let chunks = plain(&["0", "1", "2", "3", "4", "5"]);
        let provider = ReversingProvider { total: 6 };
        let audio = synthesize_chunks(&provider, &chunks, VOICE, 4).unwrap();
        assert_eq!(audio, b"012345".to_vec());
    }

    #[test]
    fn test_parallel_matches_sequential_output() {
        let chunks = plain(&["one", "two", "three", "four"]);
        let sequential = synthesize_chunks(&MockSpeechProvider::new(), &chunks, VOICE, 1).unwrap();
        let parallel = synthesize_chunks(&MockSpeechProvider::new(), &chunks, VOICE, 3).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_empty_audio_names_the_chunk() {
        let provider = MockSpeechProvider::new().with_empty_audio();
        let err = synthesize_chunks(&provider, &plain(&["a", "b"]), VOICE, 1).unwrap_err();
        assert_eq!(
            err,
            CollaboratorError::Synthesis {
                message: "chunk 0 produced no audio".to_string()
            }
        );
    }

    #[test]
    fn test_failure_in_any_chunk_fails_the_call() {
        let provider = MockSpeechProvider::new().with_failure_on("bad");
        for parallelism in [1, 3] {
            let result =
                synthesize_chunks(&provider, &plain(&["ok", "bad", "ok"]), VOICE, parallelism);
            assert!(
                matches!(result, Err(CollaboratorError::Synthesis { .. })),
                "parallelism {} should fail",
                parallelism
            );
        }
    }

    #[test]
    fn test_voice_and_kind_reach_the_provider() {
        let provider = MockSpeechProvider::new();
        let chunks = vec![SpeechText {
            body: "<speak>x</speak>".to_string(),
            kind: TextKind::Ssml,
        }];
        let voice = Voice {
            voice_id: "Matthew",
            output_format: "ogg_vorbis",
        };
        synthesize_chunks(&provider, &chunks, voice, 2).unwrap();
        let requests = provider.requests();
        assert_eq!(requests[0].voice_id, "Matthew");
        assert_eq!(requests[0].output_format, "ogg_vorbis");
        assert_eq!(requests[0].kind, TextKind::Ssml);
    }

    #[test]
    fn test_no_chunks_yields_no_audio() {
        let audio = synthesize_chunks(&MockSpeechProvider::new(), &[], VOICE, 4).unwrap();
        assert!(audio.is_empty());
    }
}
