use msf_histogram::Histogram;

fn main() {
    let mut monday = Histogram::new(2);
    for (latency, requests) in [(123.3, 23.0), (125.1, 4.0), (23456.43, 11.0)] {
        monday.insert(latency, requests);
    }
    println!("monday = {:?}", monday);

    let mut tuesday = Histogram::new(2);
    for (latency, requests) in [(123.0, 6.0), (23456.0, 1000.0), (0.5, 3.0)] {
        tuesday.insert(latency, requests);
    }
    println!("tuesday = {:?}", tuesday);

    println!("combined total = {}", monday.combine(&tuesday).total());
    println!("overlap total = {}", monday.min(&tuesday).total());
    println!("difference total = {}", monday.cancel(&tuesday).total());

    let bytes = monday.serialize();
    let coarse = Histogram::deserialize(&bytes, 0).expect("valid record");
    println!("{} bytes, re-binned at resolution 0 = {:?}", bytes.len(), coarse);
    for (key, weight) in coarse.iter() {
        println!("  {key}: {weight}");
    }
}
