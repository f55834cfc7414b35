pub fn command_to_string(cmd: &std::process::Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args = cmd
        .get_args()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_program_and_args() {
        let mut cmd = std::process::Command::new("DNAshape");
        cmd.arg("in.seq").arg("MGW");
        assert_eq!(command_to_string(&cmd), "DNAshape in.seq MGW");
        assert_eq!(command_to_string(&std::process::Command::new("ls")), "ls");
    }
}
