use std::hash::RandomState;

use chained_map::HashMap;
use chained_map::ResizePolicy;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    /// Number of keys to insert before erasing them again.
    #[arg(short = 'n', long = "num_keys", default_value_t = 1000)]
    num_keys: u64,

    /// Bucket count the map never shrinks below.
    #[arg(short = 'm', long = "min_capacity", default_value_t = 1)]
    min_capacity: usize,
}

fn main() {
    let args = Args::parse();

    let policy = ResizePolicy::default().with_min_capacity(args.min_capacity);
    let mut map = match HashMap::with_policy_and_hasher(policy, RandomState::new()) {
        Ok(map) => map,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    println!("Initial capacity: {}", map.capacity());
    println!("Inserting {} keys...", args.num_keys);

    let mut capacity = map.capacity();
    for key in 0..args.num_keys {
        map.insert(key, key * 2);
        if map.capacity() != capacity {
            println!(
                "  grew {:>7} -> {:>7} buckets at len {:>7}",
                capacity,
                map.capacity(),
                map.len()
            );
            capacity = map.capacity();
        }
    }

    println!(
        "Final load factor after inserting: {:.2}%",
        map.load_factor() * 100.0
    );
    map.bucket_stats().print();

    println!("Erasing every key...");
    for key in 0..args.num_keys {
        map.erase(&key);
        if map.capacity() != capacity {
            println!(
                "  shrank {:>7} -> {:>7} buckets at len {:>7}",
                capacity,
                map.capacity(),
                map.len()
            );
            capacity = map.capacity();
        }
    }

    println!("Capacity after erasing: {}", map.capacity());
    map.bucket_stats().print();
}
