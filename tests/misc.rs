#[macro_use]
mod common;

#[cfg(test)]
mod misc {
    tests! {
        clock in misc is OK
        "true"
    }
}
