use fem_vtk::prelude::*;
use fem_vtk::read_vtu;

use std::fs;

fn bar(part: &str, time: f64) -> Model {
    let mut model = Model::new(
        vec![1],
        vec![vec![1, 2]],
        vec![3],
        vec![1, 2],
        vec![vec![0.], vec![1.]],
        "bar",
        part,
    )
    .unwrap()
    .with_step("Step-1", time);

    model
        .add_scalar_field("u", FieldPosition::Nodes, vec![0., time])
        .unwrap();

    model
}

#[test]
fn time_series() {
    let dir = std::env::temp_dir()
        .join("fem_vtk_tests")
        .join("time_series");
    let _ = fs::remove_dir_all(&dir);

    let writer = BinaryWriter::new(WriterConfig::default().with_output_dir(&dir));
    let mut collection = CollectionWriter::new(writer, "bar_series").unwrap();
    assert!(collection.is_empty());

    for (i, time) in [0.0, 0.5, 1.0].into_iter().enumerate() {
        let path = collection.write(&bar("left", time)).unwrap();
        assert_eq!(path, dir.join("bar").join(format!("left_{i}.vtu")));
    }
    collection.write(&bar("right", 1.0)).unwrap();
    assert_eq!(collection.len(), 4);

    let pvd = collection.finish().unwrap();
    assert_eq!(pvd, dir.join("bar_series.pvd"));

    let xml = fs::read_to_string(&pvd).unwrap();
    assert!(xml.contains(r#"<DataSet timestep="0.5" group="" part="0" file="bar/left_1.vtu"/>"#));
    assert!(xml.contains(r#"<DataSet timestep="1.0" group="" part="1" file="bar/right_0.vtu"/>"#));

    let grid = read_vtu(dir.join("bar").join("left_2.vtu")).unwrap();
    assert_eq!(grid.point_array("u").unwrap().floats(), vec![0., 1.]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn models_sharing_a_part_name() {
    let dir = std::env::temp_dir()
        .join("fem_vtk_tests")
        .join("shared_part_name");
    let _ = fs::remove_dir_all(&dir);

    let writer = AsciiWriter::new(WriterConfig::default().with_output_dir(&dir));
    let mut collection = CollectionWriter::new(writer, "two_models").unwrap();

    let defaults = Model::from_mesh(vec![1], vec![vec![1]], vec![1], vec![1], vec![vec![0.]])
        .unwrap();
    let a = Model::new(vec![1], vec![vec![1]], vec![1], vec![1], vec![vec![0.]], "A", "p")
        .unwrap();
    let b = Model::new(vec![1], vec![vec![1]], vec![1], vec![1], vec![vec![1.]], "B", "p")
        .unwrap();

    assert_eq!(collection.write(&a).unwrap(), dir.join("A").join("p_0.vtu"));
    assert_eq!(collection.write(&b).unwrap(), dir.join("B").join("p_0.vtu"));
    assert_eq!(collection.write(&a).unwrap(), dir.join("A").join("p_1.vtu"));
    collection.write(&defaults).unwrap();

    let xml = fs::read_to_string(collection.finish().unwrap()).unwrap();
    assert!(xml.contains(r#"part="0" file="A/p_0.vtu""#));
    assert!(xml.contains(r#"part="1" file="B/p_0.vtu""#));
    assert!(xml.contains(r#"part="0" file="A/p_1.vtu""#));
    assert!(xml.contains(r#"part="2" file="MODEL NAME/PART NAME_0.vtu""#));

    let _ = fs::remove_dir_all(&dir);
}
