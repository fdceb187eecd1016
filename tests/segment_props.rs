//! Test intent: property checks for segment counts, lengths and offsets.
use proptest::prelude::*;
use welchgram::segment::{segments, SegmentPlan};

proptest! {
    #[test]
    fn segments_have_block_length_and_constant_hop(
        len in 0usize..20_000,
        block_pow in 1u32..11,
        width in 1usize..2_000,
    ) {
        let block_size = 1usize << block_pow;
        let samples: Vec<f64> = (0..len).map(|i| i as f64).collect();
        let plan = SegmentPlan::for_waveform(len, block_size, width).unwrap();
        prop_assert_eq!(plan.hop(), (len / width).max(1));

        let segs: Vec<&[f64]> = segments(&samples, plan).collect();
        let expected = if len < block_size { 0 } else { (len - block_size) / plan.hop() + 1 };
        prop_assert_eq!(segs.len(), expected);
        prop_assert_eq!(plan.count(len), expected);

        for (i, seg) in segs.iter().enumerate() {
            prop_assert_eq!(seg.len(), block_size);
            prop_assert_eq!(seg[0] as usize, i * plan.hop());
        }
        if let Some(last) = segs.last() {
            // Nothing complete is left after the last segment.
            let end = last[0] as usize + block_size;
            prop_assert!(end <= len);
            prop_assert!(end + plan.hop() > len);
        }
    }

    #[test]
    fn overlap_and_gap_partition_the_hop(block_pow in 1u32..12, hop in 1usize..5_000) {
        let block_size = 1usize << block_pow;
        let plan = SegmentPlan::new(block_size, hop).unwrap();
        prop_assert!(plan.overlap() < block_size);
        prop_assert_eq!(block_size - plan.overlap() + plan.gap(), hop);
    }
}
