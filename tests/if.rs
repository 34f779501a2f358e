#[macro_use]
mod common;

#[cfg(test)]
mod _if {
    tests! {
        else_branch in if is OK
        "then"
        "else"
    }

    tests! {
        dangling_else in if is OK
        "inner-else"
    }
}
