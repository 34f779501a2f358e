#[macro_use]
mod common;

#[cfg(test)]
mod _for {
    tests! {
        basic in for is OK
        "0"
        "1"
        "2"
    }

    tests! {
        no_clauses in for is OK
        "done"
    }
}
