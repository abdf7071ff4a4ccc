use pretty_assertions::assert_eq;
use trs_codec::format::{SampleCoding, Samples};
use trs_codec::traceset::{Trace, TraceSetParams, TraceSetReader, TraceSetWriter};
use trs_codec::TraceSetError;
use tempfile::tempdir;

fn float_params() -> TraceSetParams {
    TraceSetParams {
        title_space: 4,
        sample_coding: SampleCoding::Float,
        data_space: 16,
        number_of_samples: 5,
        y_scale: None,
    }
}

fn float_trace(i: u32) -> Trace {
    let title = format!("t{:03}", i).into_bytes();
    let data = (0..16).map(|b| (b as u32 * 7 + i) as u8).collect();
    let samples = (0..5).map(|s| s as f32 * 0.5 - i as f32).collect();
    Trace::new(title, data, Samples::F32(samples))
}

#[test]
fn test_ascad_style_scenario() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scenario.trs");

    let params = TraceSetParams {
        title_space: 0,
        sample_coding: SampleCoding::Byte,
        data_space: 4,
        number_of_samples: 3,
        y_scale: None,
    };
    let mut writer = TraceSetWriter::create(&path, &params).unwrap();
    writer
        .add_trace(&Trace::new(b"".to_vec(), vec![1, 2, 3, 4], Samples::U8(vec![10, 20, 30])))
        .unwrap();
    writer.close().unwrap();

    let mut set = TraceSetReader::open(&path).unwrap();
    assert_eq!(set.number_of_traces(), 1);

    let trace = set.get_trace(0).unwrap();
    assert!(trace.title.is_empty());
    assert_eq!(trace.data, vec![1, 2, 3, 4]);
    assert_eq!(trace.samples, Samples::U8(vec![10, 20, 30]));
}

#[test]
fn test_round_trip_float_traces() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("float.trs");

    let mut writer = TraceSetWriter::create(&path, &float_params()).unwrap();
    let written: Vec<Trace> = (0..10).map(float_trace).collect();
    for trace in &written {
        writer.add_trace(trace).unwrap();
    }
    writer.close().unwrap();

    let mut set = TraceSetReader::open(&path).unwrap();
    for (i, expected) in written.iter().enumerate() {
        assert_eq!(&set.get_trace(i as i64).unwrap(), expected);
    }
}

#[test]
fn test_file_size_invariant() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("size.trs");

    let mut writer = TraceSetWriter::create(&path, &float_params()).unwrap();
    let block_start = writer.layout().block_start;
    let stride = writer.layout().stride;
    assert_eq!(stride, 4 + 16 + 5 * 4);

    for i in 0..7 {
        writer.add_trace(&float_trace(i)).unwrap();
        let file_len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(writer.number_of_traces(), i + 1);
        assert_eq!(file_len, block_start + (i as u64 + 1) * stride);
    }
}

#[test]
fn test_random_access_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("random.trs");

    let mut writer = TraceSetWriter::create(&path, &float_params()).unwrap();
    for i in 0..6 {
        writer.add_trace(&float_trace(i)).unwrap();
    }
    writer.close().unwrap();

    let mut set = TraceSetReader::open(&path).unwrap();
    let forward: Vec<Trace> = (0..6).map(|i| set.get_trace(i).unwrap()).collect();
    let backward: Vec<Trace> = (0..6).rev().map(|i| set.get_trace(i).unwrap()).collect();

    for i in [3, 3, 0, 5, 3] {
        assert_eq!(set.get_trace(i).unwrap(), forward[i as usize]);
    }
    assert_eq!(forward, backward.into_iter().rev().collect::<Vec<_>>());
}

#[test]
fn test_index_bounds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bounds.trs");

    let mut writer = TraceSetWriter::create(&path, &float_params()).unwrap();
    writer.add_trace(&float_trace(0)).unwrap();
    writer.add_trace(&float_trace(1)).unwrap();
    writer.close().unwrap();

    let mut set = TraceSetReader::open(&path).unwrap();
    assert!(matches!(
        set.get_trace(2),
        Err(TraceSetError::OutOfRange { index: 2, count: 2 })
    ));
    assert!(matches!(
        set.get_trace(-1),
        Err(TraceSetError::OutOfRange { index: -1, count: 2 })
    ));
    // A failed call leaves the set usable
    assert_eq!(set.get_trace(1).unwrap(), float_trace(1));
}

#[test]
fn test_size_mismatch_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mismatch.trs");

    let mut writer = TraceSetWriter::create(&path, &float_params()).unwrap();
    writer.add_trace(&float_trace(0)).unwrap();
    let len_before = std::fs::metadata(&path).unwrap().len();

    let mut short_data = float_trace(1);
    short_data.data.pop();
    let err = writer.add_trace(&short_data).unwrap_err();
    assert!(matches!(
        err,
        TraceSetError::SizeMismatch { field: "data", expected: 16, actual: 15 }
    ));

    let mut long_title = float_trace(1);
    long_title.title.push(b'!');
    assert!(matches!(
        writer.add_trace(&long_title),
        Err(TraceSetError::SizeMismatch { field: "title", .. })
    ));

    assert_eq!(writer.number_of_traces(), 1);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), len_before);
    writer.close().unwrap();

    let set = TraceSetReader::open(&path).unwrap();
    assert_eq!(set.number_of_traces(), 1);
}

#[test]
fn test_iteration_restarts_with_current_count() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("grow.trs");

    let mut writer = TraceSetWriter::create(&path, &float_params()).unwrap();
    writer.add_trace(&float_trace(0)).unwrap();
    writer.add_trace(&float_trace(1)).unwrap();

    let mut set = TraceSetReader::open(&path).unwrap();
    let first_pass: Vec<Trace> = set.iter().map(|t| t.unwrap()).collect();
    assert_eq!(first_pass.len(), 2);

    writer.add_trace(&float_trace(2)).unwrap();
    set.reload().unwrap();

    let second_pass: Vec<Trace> = set.iter().map(|t| t.unwrap()).collect();
    assert_eq!(second_pass.len(), 3);
    assert_eq!(&second_pass[..2], &first_pass[..]);
    assert_eq!(second_pass[2], float_trace(2));
}

#[test]
fn test_integer_codings_round_trip() {
    let dir = tempdir().unwrap();

    let cases = [
        (SampleCoding::Short, Samples::U16(vec![0, 1, 0xffff])),
        (SampleCoding::Int, Samples::U32(vec![0xdead_beef, 7, 0])),
    ];
    for (i, (coding, samples)) in cases.into_iter().enumerate() {
        let path = dir.path().join(format!("int{}.trs", i));
        let params = TraceSetParams {
            sample_coding: coding,
            number_of_samples: 3,
            ..Default::default()
        };
        let mut writer = TraceSetWriter::create(&path, &params).unwrap();
        writer.add_trace(&Trace::new(vec![], vec![], samples.clone())).unwrap();
        writer.close().unwrap();

        let mut set = TraceSetReader::open(&path).unwrap();
        assert_eq!(set.get_trace(0).unwrap().samples, samples);
    }
}

#[test]
fn test_create_truncates_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reuse.trs");

    let mut writer = TraceSetWriter::create(&path, &float_params()).unwrap();
    for i in 0..4 {
        writer.add_trace(&float_trace(i)).unwrap();
    }
    writer.close().unwrap();

    let writer = TraceSetWriter::create(&path, &float_params()).unwrap();
    let block_start = writer.layout().block_start;
    writer.close().unwrap();

    assert_eq!(std::fs::metadata(&path).unwrap().len(), block_start);
    let mut set = TraceSetReader::open(&path).unwrap();
    assert_eq!(set.number_of_traces(), 0);
    assert!(set.iter().next().is_none());
}

#[test]
fn test_y_scale_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scaled.trs");

    let params = TraceSetParams {
        sample_coding: SampleCoding::Short,
        number_of_samples: 2,
        y_scale: Some(0.125),
        ..Default::default()
    };
    let mut writer = TraceSetWriter::create(&path, &params).unwrap();
    writer.add_trace(&Trace::new(vec![], vec![], Samples::U16(vec![8, 16]))).unwrap();
    writer.close().unwrap();

    let mut set = TraceSetReader::open(&path).unwrap();
    let y_scale = set.header().y_scale;
    assert_eq!(y_scale, 0.125);
    assert_eq!(set.get_trace(0).unwrap().scaled_samples(y_scale), vec![1.0, 2.0]);
}
