use hilbert_geohash::{GeohashCell, GeohashConfig, GeohashError, backend};

fn main() -> Result<(), GeohashError> {
    let lng = -2.2479699500757597;
    let lat = 53.48082746395233;

    let config = GeohashConfig::default();
    let cell = GeohashCell::from_wgs84(&(lng, lat), &config)?;

    println!("Backend: {}", backend().name());
    println!("Geohash: {}", cell.id);
    println!("Center: ({}, {})", cell.lng(), cell.lat());
    println!("Error: ({}, {})", cell.lng_err, cell.lat_err);

    for (direction, neighbour) in cell.neighbours()? {
        println!("{:>10}: {}", direction, neighbour.id);
    }

    println!("Feature: {}", cell.to_feature());

    Ok(())
}
