use ndarray::array;

use crate::error::DaedalusError;
use crate::replay_buffer::{ReplayBuffer, Transition};

fn transition(tag: f32) -> Transition {
    Transition {
        state: array![tag],
        action: 0,
        reward: tag,
        next_state: array![tag + 1.0],
        done: false,
    }
}

#[test]
fn test_push_and_sample() {
    let mut buffer = ReplayBuffer::new(10);
    let t = transition(0.5);
    buffer.push(t.clone());
    assert_eq!(buffer.len(), 1);

    let sample = buffer.sample(1).unwrap();
    assert_eq!(sample[0], &t);
}

#[test]
fn test_capacity_evicts_oldest() {
    let mut buffer = ReplayBuffer::new(3);

    // A, B, C, D with capacity 3 leaves [B, C, D]
    for tag in [1.0, 2.0, 3.0, 4.0] {
        buffer.push(transition(tag));
    }

    assert_eq!(buffer.len(), 3);
    let contents: Vec<f32> = buffer.recent(3).iter().map(|t| t.state[0]).collect();
    assert_eq!(contents, vec![2.0, 3.0, 4.0]);
}

#[test]
fn test_sample_insufficient_data() {
    let mut buffer = ReplayBuffer::new(10);
    buffer.push(transition(1.0));
    buffer.push(transition(2.0));

    match buffer.sample(3) {
        Err(DaedalusError::InsufficientData { requested, available }) => {
            assert_eq!(requested, 3);
            assert_eq!(available, 2);
        }
        other => panic!("expected InsufficientData, got {:?}", other.map(|v| v.len())),
    }
}

#[test]
fn test_sample_without_replacement() {
    let mut buffer = ReplayBuffer::new(10);
    for tag in 0..5 {
        buffer.push(transition(tag as f32));
    }

    let sample = buffer.sample(5).unwrap();
    let mut tags: Vec<f32> = sample.iter().map(|t| t.state[0]).collect();
    tags.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(tags, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_recent_preserves_insertion_order() {
    let mut buffer = ReplayBuffer::new(10);
    for tag in 0..6 {
        buffer.push(transition(tag as f32));
    }

    let recent: Vec<f32> = buffer.recent(3).iter().map(|t| t.state[0]).collect();
    assert_eq!(recent, vec![3.0, 4.0, 5.0]);
}

#[test]
fn test_recent_underflow_returns_all() {
    let mut buffer = ReplayBuffer::new(10);
    buffer.push(transition(1.0));
    buffer.push(transition(2.0));

    // Asking for more than stored must not panic
    let recent: Vec<f32> = buffer.recent(50).iter().map(|t| t.state[0]).collect();
    assert_eq!(recent, vec![1.0, 2.0]);
}

#[test]
fn test_is_empty() {
    let mut buffer = ReplayBuffer::new(10);
    assert!(buffer.is_empty());

    buffer.push(transition(0.0));
    assert!(!buffer.is_empty());
}
